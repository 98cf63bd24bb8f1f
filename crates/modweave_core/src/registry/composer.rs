//! System composition for one mod.
//!
//! # Responsibility
//! - Instantiate the systems a mod declares.
//! - Route mod-scoped systems into the mod world and global systems into the
//!   shared world.
//! - Hand mod identity to global systems.
//!
//! # Invariants
//! - Placement is idempotent by type within a world.
//! - Mod-scoped systems never receive mod identity.

use crate::model::descriptor::ModDescriptor;
use crate::unit::code_unit::CodeUnit;
use crate::unit::discovery::{discover_types, TypeFilter, TypeLoadDiagnostic};
use crate::unit::type_info::{BaseClass, TypeConstructor};
use crate::world::context::World;
use log::{error, info};
use std::sync::Arc;

/// Systems placed while composing one mod, by short type name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    pub mod_scoped: Vec<&'static str>,
    pub global: Vec<&'static str>,
}

impl CompositionReport {
    pub fn total(&self) -> usize {
        self.mod_scoped.len() + self.global.len()
    }
}

/// Places every system declared across `units`.
pub fn compose_systems(
    descriptor: &Arc<ModDescriptor>,
    units: &[&dyn CodeUnit],
    mod_world: &mut World,
    shared_world: &mut World,
    diagnostics: &mut Vec<TypeLoadDiagnostic>,
) -> CompositionReport {
    let filter = TypeFilter::systems();
    let mut report = CompositionReport::default();

    for unit in units {
        for entry in discover_types(*unit, diagnostics).filter(&filter) {
            let Some(TypeConstructor::System(factory)) = entry.constructor() else {
                error!(
                    "event=system_compose module=registry status=error unit={} type={} error_code=missing_constructor",
                    unit.name(),
                    entry.name()
                );
                continue;
            };

            if entry.derives_from(BaseClass::ModSystem) {
                mod_world.get_or_create_system(factory);
                report.mod_scoped.push(factory.key().short_name());
            } else {
                // Identity goes to the placed instance; the mod world type
                // declares no injection slots.
                shared_world
                    .get_or_create_system(factory)
                    .receive_mod_identity(descriptor);
                report.global.push(factory.key().short_name());
            }
        }
    }

    info!(
        "event=system_compose module=registry status=ok index={} name_id={} mod_scoped={} global={}",
        descriptor.index,
        descriptor.name_id,
        report.mod_scoped.len(),
        report.global.len()
    );
    report
}
