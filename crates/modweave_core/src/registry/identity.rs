//! Mod identity registry.
//!
//! # Responsibility
//! - Allocate descriptors with sequential indices.
//! - Map code units to their owning mod.
//!
//! # Invariants
//! - `index` equals the number of mods registered before it.
//! - Mods are never removed; indices are never reused.
//! - Rebinding a code unit replaces its owner (last write wins).

use crate::model::descriptor::{ModDescriptor, ModDescriptorData};
use crate::registry::error::NotFoundError;
use crate::unit::code_unit::{CodeUnit, CodeUnitId};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ModIdentityRegistry {
    mods: Vec<Arc<ModDescriptor>>,
    owners: HashMap<CodeUnitId, Arc<ModDescriptor>>,
}

impl ModIdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a descriptor and binds every unit to it.
    pub fn register(
        &mut self,
        units: &[&dyn CodeUnit],
        data: ModDescriptorData,
    ) -> Arc<ModDescriptor> {
        let descriptor = Arc::new(ModDescriptor::new(data, self.mods.len()));
        self.mods.push(Arc::clone(&descriptor));

        for unit in units {
            if let Some(previous) = self.owners.insert(unit.id(), Arc::clone(&descriptor)) {
                debug!(
                    "event=code_unit_rebind module=registry status=ok unit={} from_index={} to_index={}",
                    unit.name(),
                    previous.index,
                    descriptor.index
                );
            }
        }
        descriptor
    }

    pub fn owning_mod(&self, unit_id: CodeUnitId) -> Result<Arc<ModDescriptor>, NotFoundError> {
        self.owners
            .get(&unit_id)
            .cloned()
            .ok_or(NotFoundError::CodeUnit(unit_id))
    }

    /// First mod registered with `name_id`.
    pub fn find_by_name_id(&self, name_id: &str) -> Result<Arc<ModDescriptor>, NotFoundError> {
        self.mods
            .iter()
            .find(|descriptor| descriptor.name_id == name_id)
            .cloned()
            .ok_or_else(|| NotFoundError::NameId(name_id.to_string()))
    }

    /// Registered mods in registration order (a copy).
    pub fn loaded_mods(&self) -> Vec<Arc<ModDescriptor>> {
        self.mods.clone()
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }
}
