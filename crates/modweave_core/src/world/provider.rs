//! Per-mod world provider.

use crate::model::descriptor::ModDescriptor;
use crate::world::context::World;
use log::info;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lazily created isolated worlds, one per mod index.
#[derive(Default)]
pub struct ModWorlds {
    worlds: BTreeMap<usize, World>,
}

impl ModWorlds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the world of `descriptor`, creating it on first request.
    pub fn get_or_create(&mut self, descriptor: &Arc<ModDescriptor>) -> &mut World {
        self.worlds.entry(descriptor.index).or_insert_with(|| {
            info!(
                "event=mod_world_create module=world status=ok index={} name_id={}",
                descriptor.index, descriptor.name_id
            );
            World::for_mod(Arc::clone(descriptor))
        })
    }

    /// Returns the world of `descriptor` if it was already created.
    pub fn get(&self, descriptor: &ModDescriptor) -> Option<&World> {
        self.worlds.get(&descriptor.index)
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}
