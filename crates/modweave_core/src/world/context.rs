//! World: a type-keyed container of system instances.
//!
//! # Responsibility
//! - Create-or-fetch systems by type, keeping creation order.
//! - Give typed read/write access to placed systems.
//!
//! # Invariants
//! - At most one instance per system type.
//! - Instances are never removed once created.

use crate::model::descriptor::ModDescriptor;
use crate::world::system::{System, SystemFactory, SystemKey};
use log::debug;
use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Execution context holding system instances.
pub struct World {
    name: String,
    owner: Option<Arc<ModDescriptor>>,
    systems: HashMap<TypeId, Box<dyn System>>,
    order: Vec<SystemKey>,
}

impl World {
    /// Creates an empty world not owned by any mod.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            systems: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Creates the isolated world of one mod.
    pub(crate) fn for_mod(descriptor: Arc<ModDescriptor>) -> Self {
        let mut world = Self::new(format!("ModWorld({})", descriptor.name_id));
        world.owner = Some(descriptor);
        world
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mod owning this world, `None` for the shared world.
    pub fn owner(&self) -> Option<&Arc<ModDescriptor>> {
        self.owner.as_ref()
    }

    /// Returns the instance of the factory's type, creating it on first use.
    ///
    /// # Invariants
    /// - A second request for the same type returns the existing instance.
    /// - `System::on_create` runs only for newly created instances.
    pub fn get_or_create_system(
        &mut self,
        factory: &SystemFactory,
    ) -> &mut (dyn System + 'static) {
        let key = factory.key();
        match self.systems.entry(key.type_id()) {
            Entry::Occupied(entry) => entry.into_mut().as_mut(),
            Entry::Vacant(entry) => {
                let mut system = factory.create();
                system.on_create();
                self.order.push(key);
                debug!(
                    "event=system_create module=world status=ok world={} system={}",
                    self.name,
                    key.short_name()
                );
                entry.insert(system).as_mut()
            }
        }
    }

    /// Returns an existing instance by key without creating one.
    pub fn existing_system_mut(&mut self, key: SystemKey) -> Option<&mut (dyn System + 'static)> {
        self.systems
            .get_mut(&key.type_id())
            .map(|system| system.as_mut())
    }

    /// Typed read access to a placed system.
    pub fn system<T: System>(&self) -> Option<&T> {
        self.systems
            .get(&TypeId::of::<T>())
            .and_then(|system| (**system).as_any().downcast_ref::<T>())
    }

    /// Typed write access to a placed system.
    pub fn system_mut<T: System>(&mut self) -> Option<&mut T> {
        self.systems
            .get_mut(&TypeId::of::<T>())
            .and_then(|system| (**system).as_any_mut().downcast_mut::<T>())
    }

    pub fn contains<T: System>(&self) -> bool {
        self.systems.contains_key(&TypeId::of::<T>())
    }

    /// Placed system keys in creation order.
    pub fn system_keys(&self) -> &[SystemKey] {
        &self.order
    }

    /// Short type names of placed systems in creation order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.order.iter().map(|key| key.short_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Runs `update` on the given systems, in the given order.
    ///
    /// Keys that are not placed in this world are ignored.
    pub fn update_in_order(&mut self, order: &[SystemKey]) {
        for key in order {
            if let Some(system) = self.systems.get_mut(&key.type_id()) {
                system.update();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::World;
    use crate::world::system::{System, SystemFactory, SystemKey};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Physics {
        created: bool,
        steps: u32,
    }

    impl System for Physics {
        fn on_create(&mut self) {
            self.created = true;
        }

        fn update(&mut self) {
            self.steps += 1;
        }
    }

    #[derive(Default)]
    struct Audio;

    fn placed_address(system: &mut dyn System) -> usize {
        let physics = system
            .as_any_mut()
            .downcast_mut::<Physics>()
            .expect("placed system should be Physics");
        physics as *mut Physics as usize
    }

    impl System for Audio {}

    #[test]
    fn get_or_create_is_idempotent_by_type() {
        let constructions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&constructions);
        let factory = SystemFactory::with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Physics::default()
        });

        let mut world = World::new("shared");
        let first = placed_address(world.get_or_create_system(&factory));
        let second = placed_address(world.get_or_create_system(&factory));

        assert_eq!(first, second);
        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert_eq!(world.len(), 1);
        assert!(world.system::<Physics>().expect("physics placed").created);
    }

    #[test]
    fn keeps_creation_order() {
        let mut world = World::new("shared");
        world.get_or_create_system(&SystemFactory::of::<Audio>());
        world.get_or_create_system(&SystemFactory::of::<Physics>());
        world.get_or_create_system(&SystemFactory::of::<Audio>());

        assert_eq!(world.system_names(), vec!["Audio", "Physics"]);
        assert!(world.contains::<Audio>());
    }

    #[test]
    fn existing_lookup_does_not_create() {
        let mut world = World::new("shared");
        assert!(world.existing_system_mut(SystemKey::of::<Audio>()).is_none());
        assert!(world.is_empty());
    }

    #[test]
    fn update_in_order_skips_missing_systems() {
        let mut world = World::new("shared");
        world.get_or_create_system(&SystemFactory::of::<Physics>());

        world.update_in_order(&[SystemKey::of::<Audio>(), SystemKey::of::<Physics>()]);
        world.update_in_order(&[SystemKey::of::<Physics>()]);

        let physics = world.system_mut::<Physics>().expect("physics placed");
        assert_eq!(physics.steps, 2);
    }
}
