//! Type descriptors exposed by code units.
//!
//! # Responsibility
//! - Describe one type a code unit contributes: lineage, flags, constructor.
//! - Offer builders so manifests are checked at compile time.
//!
//! # Invariants
//! - Builders pair a lineage with the matching constructor kind.
//! - Abstract descriptors carry no constructor.

use crate::registry::bootstrap::{BootstrapFactory, ModBootstrap};
use crate::world::system::{short_type_name, System, SystemFactory};
use std::fmt::{Debug, Formatter};

/// Base a discovered type can derive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseClass {
    /// One-shot mod initialization hook.
    Bootstrap,
    /// Any system, mod-scoped or global.
    System,
    /// System living in the mod's isolated world.
    ModSystem,
}

/// Concrete lineage of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLineage {
    Bootstrap,
    ModSystem,
    GlobalSystem,
}

impl TypeLineage {
    /// Strict-subclass check against a base.
    pub fn derives_from(self, base: BaseClass) -> bool {
        matches!(
            (self, base),
            (Self::Bootstrap, BaseClass::Bootstrap)
                | (Self::ModSystem, BaseClass::System)
                | (Self::ModSystem, BaseClass::ModSystem)
                | (Self::GlobalSystem, BaseClass::System)
        )
    }
}

/// Structural flags of a described type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeFlags {
    pub is_abstract: bool,
    /// Has open type parameters.
    pub is_generic: bool,
    /// Opt-out marker: excluded from automatic creation.
    pub auto_creation_disabled: bool,
}

/// Constructor attached to a concrete descriptor.
#[derive(Clone, Debug)]
pub enum TypeConstructor {
    Bootstrap(BootstrapFactory),
    System(SystemFactory),
}

/// One type contributed by a code unit.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    lineage: Option<TypeLineage>,
    flags: TypeFlags,
    constructor: Option<TypeConstructor>,
}

impl TypeDescriptor {
    /// Bootstrap built with `T::default()`.
    pub fn bootstrap<T: ModBootstrap + Default>() -> Self {
        Self::bootstrap_entry(BootstrapFactory::of::<T>())
    }

    /// Bootstrap built with a closure.
    pub fn bootstrap_with<T, F>(ctor: F) -> Self
    where
        T: ModBootstrap,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::bootstrap_entry(BootstrapFactory::with(ctor))
    }

    fn bootstrap_entry(factory: BootstrapFactory) -> Self {
        Self {
            name: factory.type_name().to_string(),
            lineage: Some(TypeLineage::Bootstrap),
            flags: TypeFlags::default(),
            constructor: Some(TypeConstructor::Bootstrap(factory)),
        }
    }

    /// Mod-scoped system built with `T::default()`.
    pub fn mod_system<T: System + Default>() -> Self {
        Self::system_entry(TypeLineage::ModSystem, SystemFactory::of::<T>())
    }

    /// Mod-scoped system built with a closure.
    pub fn mod_system_with<T, F>(ctor: F) -> Self
    where
        T: System,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::system_entry(TypeLineage::ModSystem, SystemFactory::with(ctor))
    }

    /// Global system built with `T::default()`.
    pub fn global_system<T: System + Default>() -> Self {
        Self::system_entry(TypeLineage::GlobalSystem, SystemFactory::of::<T>())
    }

    /// Global system built with a closure.
    pub fn global_system_with<T, F>(ctor: F) -> Self
    where
        T: System,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::system_entry(TypeLineage::GlobalSystem, SystemFactory::with(ctor))
    }

    /// Abstract type of the given lineage; never instantiated.
    pub fn abstract_type(name: impl Into<String>, lineage: TypeLineage) -> Self {
        Self {
            name: name.into(),
            lineage: Some(lineage),
            flags: TypeFlags {
                is_abstract: true,
                ..TypeFlags::default()
            },
            constructor: None,
        }
    }

    /// Type unrelated to bootstraps or systems (data, helpers).
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lineage: None,
            flags: TypeFlags::default(),
            constructor: None,
        }
    }

    /// Marks the type as having open type parameters.
    pub fn generic(mut self) -> Self {
        self.flags.is_generic = true;
        self
    }

    /// Applies the opt-out marker.
    pub fn disable_auto_creation(mut self) -> Self {
        self.flags.auto_creation_disabled = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lineage(&self) -> Option<TypeLineage> {
        self.lineage
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub fn constructor(&self) -> Option<&TypeConstructor> {
        self.constructor.as_ref()
    }

    /// Strict-subclass check; `false` for types without lineage.
    pub fn derives_from(&self, base: BaseClass) -> bool {
        self.lineage
            .map(|lineage| lineage.derives_from(base))
            .unwrap_or(false)
    }

    fn system_entry(lineage: TypeLineage, factory: SystemFactory) -> Self {
        Self {
            name: short_type_name(factory.key().type_name()).to_string(),
            lineage: Some(lineage),
            flags: TypeFlags::default(),
            constructor: Some(TypeConstructor::System(factory)),
        }
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("lineage", &self.lineage)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{BaseClass, TypeDescriptor, TypeLineage};
    use crate::world::system::System;

    #[derive(Default)]
    struct Radar;

    impl System for Radar {}

    #[test]
    fn mod_system_derives_from_both_system_bases() {
        let entry = TypeDescriptor::mod_system::<Radar>();
        assert_eq!(entry.name(), "Radar");
        assert!(entry.derives_from(BaseClass::System));
        assert!(entry.derives_from(BaseClass::ModSystem));
        assert!(!entry.derives_from(BaseClass::Bootstrap));
    }

    #[test]
    fn global_system_is_not_mod_scoped() {
        let entry = TypeDescriptor::global_system::<Radar>();
        assert!(entry.derives_from(BaseClass::System));
        assert!(!entry.derives_from(BaseClass::ModSystem));
    }

    #[test]
    fn plain_and_abstract_types() {
        let plain = TypeDescriptor::plain("Settings");
        assert!(plain.lineage().is_none());
        assert!(!plain.derives_from(BaseClass::System));

        let base = TypeDescriptor::abstract_type("BaseRadar", TypeLineage::GlobalSystem);
        assert!(base.flags().is_abstract);
        assert!(base.constructor().is_none());
    }

    #[test]
    fn builder_flags_accumulate() {
        let entry = TypeDescriptor::global_system::<Radar>()
            .generic()
            .disable_auto_creation();
        assert!(entry.flags().is_generic);
        assert!(entry.flags().auto_creation_disabled);
        assert!(!entry.flags().is_abstract);
    }
}
