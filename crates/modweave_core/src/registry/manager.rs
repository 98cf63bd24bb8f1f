//! Mod manager: the registration entry points.
//!
//! # Responsibility
//! - Own every registry-side structure (identities, mod worlds, gate, events).
//! - Run the registration pipeline: identity, bootstraps, mod world, systems,
//!   update order, notification.
//!
//! # Invariants
//! - Bootstraps of a mod finish before any of its systems is created.
//! - "New mod" observers run after systems are placed and the host rebuilt
//!   its update order.
//! - At most one internal registration session per manager.

use crate::config::{ExternalLoadPolicy, RuntimeConfig};
use crate::model::descriptor::{IntegrationKind, ModDescriptor, ModDescriptorData};
use crate::registry::bootstrap::run_bootstraps;
use crate::registry::composer::compose_systems;
use crate::registry::error::{ModError, ModResult, SequenceError};
use crate::registry::events::RegistrationEvents;
use crate::registry::gate::{GateState, InternalRegistrationGate};
use crate::registry::identity::ModIdentityRegistry;
use crate::unit::code_unit::{CodeUnit, CodeUnitId};
use crate::unit::discovery::TypeLoadDiagnostic;
use crate::world::context::World;
use crate::world::host::SystemHost;
use crate::world::provider::ModWorlds;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Registry aggregate owned by the host application.
pub struct ModManager {
    identities: ModIdentityRegistry,
    worlds: ModWorlds,
    gate: InternalRegistrationGate,
    events: RegistrationEvents,
    diagnostics: Vec<TypeLoadDiagnostic>,
    external_loads: ExternalLoadPolicy,
    pending_external: Vec<Arc<ModDescriptor>>,
}

impl ModManager {
    pub fn new() -> Self {
        Self::with_policy(ExternalLoadPolicy::default())
    }

    pub fn with_config(config: &RuntimeConfig) -> Self {
        Self::with_policy(config.external_loads)
    }

    pub fn with_policy(external_loads: ExternalLoadPolicy) -> Self {
        Self {
            identities: ModIdentityRegistry::new(),
            worlds: ModWorlds::new(),
            gate: InternalRegistrationGate::new(),
            events: RegistrationEvents::default(),
            diagnostics: Vec::new(),
            external_loads,
            pending_external: Vec::new(),
        }
    }

    /// Registers one mod made of `units` and composes it into `host`.
    ///
    /// # Errors
    /// - `ModError::EmptyCodeUnits` when `units` is empty.
    pub fn register_mod(
        &mut self,
        host: &mut dyn SystemHost,
        units: &[&dyn CodeUnit],
        data: ModDescriptorData,
    ) -> ModResult<Arc<ModDescriptor>> {
        if units.is_empty() {
            warn!(
                "event=mod_register module=registry status=error name_id={} error_code=empty_code_units",
                data.name_id
            );
            return Err(ModError::EmptyCodeUnits);
        }

        let started_at = Instant::now();
        let descriptor = self.identities.register(units, data);
        info!(
            "event=mod_register module=registry status=start index={} name_id={} integration={} units={}",
            descriptor.index,
            descriptor.name_id,
            descriptor.integration.as_str(),
            units.len()
        );

        if !descriptor.integration.is_integrated() {
            self.queue_external_load(&descriptor);
        }

        let mut failed_types = Vec::new();
        run_bootstraps(&descriptor, units, &mut failed_types);

        let mut compose_pass = Vec::new();
        let mod_world = self.worlds.get_or_create(&descriptor);
        let report = compose_systems(
            &descriptor,
            units,
            mod_world,
            host.shared_world_mut(),
            &mut compose_pass,
        );
        host.rebuild_update_order();
        merge_type_failures(&mut failed_types, compose_pass);
        self.diagnostics.extend(failed_types);

        info!(
            "event=mod_register module=registry status=ok index={} name_id={} systems={} duration_ms={}",
            descriptor.index,
            descriptor.name_id,
            report.total(),
            started_at.elapsed().as_millis()
        );
        self.events.on_new_mod.notify(&descriptor);
        Ok(descriptor)
    }

    /// Registers a `Package` mod.
    pub fn register_package(
        &mut self,
        host: &mut dyn SystemHost,
        units: &[&dyn CodeUnit],
        display_name: &str,
        name_id: &str,
        integration: IntegrationKind,
    ) -> ModResult<Arc<ModDescriptor>> {
        self.register_mod(
            host,
            units,
            ModDescriptorData::package(display_name, name_id, integration),
        )
    }

    /// Opens the single internal registration session.
    ///
    /// # Errors
    /// - `SequenceError::AlreadyConsumed` on every call after the first.
    pub fn begin_internal_registration(&mut self) -> ModResult<InternalRegistration<'_>> {
        self.gate.open()?;
        Ok(InternalRegistration {
            manager: self,
            running: true,
        })
    }

    pub fn internal_registration_state(&self) -> GateState {
        self.gate.state()
    }

    /// Forwards the host's end-of-load signal to observers.
    pub fn notify_all_mods_loaded(&self) {
        info!(
            "event=all_mods_loaded module=registry status=ok mods={}",
            self.identities.len()
        );
        self.events.on_all_mods_loaded.notify(&());
    }

    pub fn events(&self) -> &RegistrationEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut RegistrationEvents {
        &mut self.events
    }

    pub fn owning_mod(&self, unit_id: CodeUnitId) -> ModResult<Arc<ModDescriptor>> {
        Ok(self.identities.owning_mod(unit_id)?)
    }

    pub fn find_mod(&self, name_id: &str) -> ModResult<Arc<ModDescriptor>> {
        Ok(self.identities.find_by_name_id(name_id)?)
    }

    /// Registered mods in registration order (a copy).
    pub fn loaded_mods(&self) -> Vec<Arc<ModDescriptor>> {
        self.identities.loaded_mods()
    }

    /// Isolated world of `descriptor`, created if absent.
    pub fn mod_world(&mut self, descriptor: &Arc<ModDescriptor>) -> &mut World {
        self.worlds.get_or_create(descriptor)
    }

    /// Types that failed to resolve, across all registrations.
    pub fn diagnostics(&self) -> &[TypeLoadDiagnostic] {
        &self.diagnostics
    }

    /// Non-integrated mods waiting for the host's external load pass.
    pub fn pending_external_loads(&self) -> &[Arc<ModDescriptor>] {
        &self.pending_external
    }

    /// Drains the external load queue.
    pub fn take_pending_external_loads(&mut self) -> Vec<Arc<ModDescriptor>> {
        std::mem::take(&mut self.pending_external)
    }

    fn queue_external_load(&mut self, descriptor: &Arc<ModDescriptor>) {
        match self.external_loads {
            ExternalLoadPolicy::Defer => {
                self.pending_external.push(Arc::clone(descriptor));
                info!(
                    "event=external_load module=registry status=deferred index={} name_id={}",
                    descriptor.index, descriptor.name_id
                );
            }
            ExternalLoadPolicy::Skip => {
                info!(
                    "event=external_load module=registry status=skipped index={} name_id={}",
                    descriptor.index, descriptor.name_id
                );
            }
        }
    }
}

impl Default for ModManager {
    fn default() -> Self {
        Self::new()
    }
}

/// The single internal registration session.
///
/// Borrows the manager for as long as it is alive. Ending or dropping the
/// session exhausts the gate for good.
pub struct InternalRegistration<'a> {
    manager: &'a mut ModManager,
    running: bool,
}

impl InternalRegistration<'_> {
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Registers one first-party mod as `InternalAndIntegrated`.
    ///
    /// # Errors
    /// - `SequenceError::SessionEnded` after `end`.
    /// - Any error of `ModManager::register_mod`.
    pub fn add_internal_mod(
        &mut self,
        host: &mut dyn SystemHost,
        display_name: &str,
        name_id: &str,
        units: &[&dyn CodeUnit],
    ) -> ModResult<Arc<ModDescriptor>> {
        if !self.running {
            return Err(SequenceError::SessionEnded.into());
        }
        self.manager.register_package(
            host,
            units,
            display_name,
            name_id,
            IntegrationKind::InternalAndIntegrated,
        )
    }

    pub fn end(&mut self) {
        self.running = false;
        self.manager.gate.exhaust();
    }
}

/// Appends `pass` entries whose (unit, type) pair is not yet in `recorded`.
fn merge_type_failures(recorded: &mut Vec<TypeLoadDiagnostic>, pass: Vec<TypeLoadDiagnostic>) {
    for diagnostic in pass {
        let seen = recorded.iter().any(|entry| {
            entry.unit_id == diagnostic.unit_id && entry.type_name == diagnostic.type_name
        });
        if !seen {
            recorded.push(diagnostic);
        }
    }
}

impl Drop for InternalRegistration<'_> {
    fn drop(&mut self) {
        self.manager.gate.exhaust();
    }
}

#[cfg(test)]
mod tests {
    use super::ModManager;
    use crate::config::ExternalLoadPolicy;
    use crate::model::descriptor::IntegrationKind;
    use crate::registry::error::{ModError, SequenceError};
    use crate::registry::gate::GateState;
    use crate::unit::manifest::CodeUnitManifest;
    use crate::unit::type_info::TypeDescriptor;
    use crate::world::host::DefaultHost;

    #[test]
    fn rejects_empty_unit_list() {
        let mut manager = ModManager::new();
        let mut host = DefaultHost::new();
        let err = manager
            .register_package(&mut host, &[], "Empty", "empty", IntegrationKind::Integrated)
            .expect_err("empty unit list must fail");
        assert_eq!(err, ModError::EmptyCodeUnits);
        assert!(manager.loaded_mods().is_empty());
        assert_eq!(host.rebuild_count(), 0);
    }

    #[test]
    fn external_mods_are_deferred_by_default() {
        let mut manager = ModManager::new();
        let mut host = DefaultHost::new();
        let unit = CodeUnitManifest::new("ext");

        manager
            .register_package(&mut host, &[&unit], "Ext", "ext", IntegrationKind::External)
            .expect("registration");
        manager
            .register_package(&mut host, &[&unit], "Int", "int", IntegrationKind::Integrated)
            .expect("registration");

        let pending = manager.take_pending_external_loads();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name_id, "ext");
        assert!(manager.pending_external_loads().is_empty());
    }

    #[test]
    fn skip_policy_does_not_queue() {
        let mut manager = ModManager::with_policy(ExternalLoadPolicy::Skip);
        let mut host = DefaultHost::new();
        let unit = CodeUnitManifest::new("ext");

        manager
            .register_package(&mut host, &[&unit], "Ext", "ext", IntegrationKind::External)
            .expect("registration");
        assert!(manager.pending_external_loads().is_empty());
    }

    #[test]
    fn dropping_session_exhausts_gate() {
        let mut manager = ModManager::new();
        {
            let session = manager
                .begin_internal_registration()
                .expect("first session opens");
            assert!(session.is_running());
        }
        assert_eq!(manager.internal_registration_state(), GateState::Exhausted);
        assert_eq!(
            manager.begin_internal_registration().err(),
            Some(ModError::Sequence(SequenceError::AlreadyConsumed))
        );
    }

    #[test]
    fn each_broken_type_is_recorded_once_per_registration() {
        let mut manager = ModManager::new();
        let mut host = DefaultHost::new();
        let unit = CodeUnitManifest::new("partial")
            .declare(TypeDescriptor::plain("Helper"))
            .declare_broken("Missing", "dependency not found");

        manager
            .register_package(&mut host, &[&unit], "First", "first", IntegrationKind::Integrated)
            .expect("registration");
        assert_eq!(manager.diagnostics().len(), 1);
        assert_eq!(manager.diagnostics()[0].type_name, "Missing");

        manager
            .register_package(&mut host, &[&unit], "Second", "second", IntegrationKind::Integrated)
            .expect("registration");
        assert_eq!(manager.diagnostics().len(), 2);
    }

    #[test]
    fn events_view_tracks_subscriptions() {
        let mut manager = ModManager::new();
        assert!(manager.events().on_new_mod.is_empty());

        let id = manager.events_mut().on_new_mod.subscribe(|_| {});
        manager.events_mut().on_all_mods_loaded.subscribe(|_| {});
        assert_eq!(manager.events().on_new_mod.len(), 1);
        assert_eq!(manager.events().on_all_mods_loaded.len(), 1);

        assert!(manager.events_mut().on_new_mod.unsubscribe(id));
        assert!(manager.events().on_new_mod.is_empty());
    }
}
