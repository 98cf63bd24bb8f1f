//! Host boundary consumed by the composer.
//!
//! # Responsibility
//! - Expose the host-owned shared world.
//! - Recompute the global update order after systems are added.
//!
//! # Invariants
//! - The shared world exists before any mod registers.
//! - Mod registration never creates or drops the shared world.

use crate::world::context::World;
use crate::world::system::SystemKey;
use log::debug;

/// Host scheduler contract.
pub trait SystemHost {
    /// Shared world visible to every mod.
    fn shared_world_mut(&mut self) -> &mut World;

    /// Recomputes the global update order after systems were placed.
    fn rebuild_update_order(&mut self);
}

/// In-process host owning one shared world.
///
/// The update order is the shared world's creation order.
pub struct DefaultHost {
    world: World,
    update_order: Vec<SystemKey>,
    rebuild_count: usize,
}

impl DefaultHost {
    pub fn new() -> Self {
        Self {
            world: World::new("Default World"),
            update_order: Vec::new(),
            rebuild_count: 0,
        }
    }

    pub fn shared_world(&self) -> &World {
        &self.world
    }

    /// Update order as of the last rebuild.
    pub fn update_order(&self) -> &[SystemKey] {
        &self.update_order
    }

    /// Number of update-order rebuilds requested so far.
    pub fn rebuild_count(&self) -> usize {
        self.rebuild_count
    }

    /// Runs one frame over the shared world.
    pub fn tick(&mut self) {
        self.world.update_in_order(&self.update_order);
    }
}

impl Default for DefaultHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemHost for DefaultHost {
    fn shared_world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn rebuild_update_order(&mut self) {
        self.update_order = self.world.system_keys().to_vec();
        self.rebuild_count += 1;
        debug!(
            "event=update_order_rebuild module=host status=ok systems={} rebuilds={}",
            self.update_order.len(),
            self.rebuild_count
        );
    }
}
