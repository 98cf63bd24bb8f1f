//! Mod bootstrap hooks and their runner.
//!
//! # Responsibility
//! - Define the one-shot initialization hook a mod can declare.
//! - Run every declared bootstrap of a mod before systems are composed.
//!
//! # Invariants
//! - Each matching bootstrap type is instantiated and run once per registration.
//! - Bootstraps run in unit order, then declaration order within a unit.

use crate::model::descriptor::ModDescriptor;
use crate::unit::code_unit::CodeUnit;
use crate::unit::discovery::{discover_types, TypeFilter, TypeLoadDiagnostic};
use crate::unit::type_info::TypeConstructor;
use crate::world::system::short_type_name;
use log::{error, info};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// One-shot initialization hook declared by a mod.
pub trait ModBootstrap: 'static {
    /// Receives the owning mod before `register` runs.
    fn attach_mod(&mut self, _descriptor: Arc<ModDescriptor>) {}

    /// Registration hook.
    fn register(&mut self);
}

type BootstrapCtor = dyn Fn() -> Box<dyn ModBootstrap> + Send + Sync;

/// Constructor for one bootstrap type.
#[derive(Clone)]
pub struct BootstrapFactory {
    type_name: &'static str,
    ctor: Arc<BootstrapCtor>,
}

impl BootstrapFactory {
    pub fn of<T: ModBootstrap + Default>() -> Self {
        Self::with(T::default)
    }

    pub fn with<T, F>(ctor: F) -> Self
    where
        T: ModBootstrap,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            type_name: short_type_name(std::any::type_name::<T>()),
            ctor: Arc::new(move || Box::new(ctor()) as Box<dyn ModBootstrap>),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn create(&self) -> Box<dyn ModBootstrap> {
        (self.ctor)()
    }
}

impl Debug for BootstrapFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapFactory")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Runs every bootstrap declared across `units` for `descriptor`.
///
/// Returns the number of bootstraps run.
pub fn run_bootstraps(
    descriptor: &Arc<ModDescriptor>,
    units: &[&dyn CodeUnit],
    diagnostics: &mut Vec<TypeLoadDiagnostic>,
) -> usize {
    let filter = TypeFilter::bootstraps();
    let mut ran = 0;

    for unit in units {
        for entry in discover_types(*unit, diagnostics).filter(&filter) {
            let Some(TypeConstructor::Bootstrap(factory)) = entry.constructor() else {
                error!(
                    "event=bootstrap_run module=registry status=error unit={} type={} error_code=missing_constructor",
                    unit.name(),
                    entry.name()
                );
                continue;
            };

            let mut bootstrap = factory.create();
            bootstrap.attach_mod(Arc::clone(descriptor));
            bootstrap.register();
            ran += 1;
        }
    }

    info!(
        "event=bootstrap_run module=registry status=ok index={} name_id={} bootstraps={}",
        descriptor.index, descriptor.name_id, ran
    );
    ran
}

#[cfg(test)]
mod tests {
    use super::{run_bootstraps, ModBootstrap};
    use crate::model::descriptor::{IntegrationKind, ModDescriptor, ModDescriptorData};
    use crate::unit::manifest::CodeUnitManifest;
    use crate::unit::type_info::{TypeDescriptor, TypeLineage};
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        label: &'static str,
        journal: Journal,
        owner: Option<Arc<ModDescriptor>>,
    }

    impl ModBootstrap for Recorder {
        fn attach_mod(&mut self, descriptor: Arc<ModDescriptor>) {
            self.owner = Some(descriptor);
        }

        fn register(&mut self) {
            let owner = self
                .owner
                .as_ref()
                .map(|descriptor| descriptor.name_id.clone())
                .unwrap_or_default();
            self.journal
                .lock()
                .expect("journal lock")
                .push(format!("{}@{}", self.label, owner));
        }
    }

    fn recorder(label: &'static str, journal: &Journal) -> TypeDescriptor {
        let journal = Arc::clone(journal);
        TypeDescriptor::bootstrap_with(move || Recorder {
            label,
            journal: Arc::clone(&journal),
            owner: None,
        })
    }

    fn descriptor() -> Arc<ModDescriptor> {
        Arc::new(ModDescriptor::new(
            ModDescriptorData::package("Weather", "weather", IntegrationKind::Integrated),
            0,
        ))
    }

    #[test]
    fn runs_bootstraps_in_unit_then_declaration_order() {
        let journal = Journal::default();
        let first = CodeUnitManifest::new("first")
            .declare(recorder("a", &journal))
            .declare(recorder("b", &journal));
        let second = CodeUnitManifest::new("second").declare(recorder("c", &journal));
        let mut diagnostics = Vec::new();

        let ran = run_bootstraps(&descriptor(), &[&first, &second], &mut diagnostics);

        assert_eq!(ran, 3);
        assert_eq!(
            *journal.lock().expect("journal lock"),
            vec!["a@weather", "b@weather", "c@weather"]
        );
    }

    #[test]
    fn skips_opted_out_and_abstract_bootstraps() {
        let journal = Journal::default();
        let unit = CodeUnitManifest::new("unit")
            .declare(recorder("kept", &journal))
            .declare(recorder("opted_out", &journal).disable_auto_creation())
            .declare(recorder("generic", &journal).generic())
            .declare(TypeDescriptor::abstract_type("BaseBootstrap", TypeLineage::Bootstrap));
        let mut diagnostics = Vec::new();

        let ran = run_bootstraps(&descriptor(), &[&unit], &mut diagnostics);

        assert_eq!(ran, 1);
        assert_eq!(*journal.lock().expect("journal lock"), vec!["kept@weather"]);
    }
}
