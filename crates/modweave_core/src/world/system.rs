//! System contract and constructors.
//!
//! # Responsibility
//! - Define the behavior-unit trait placed into worlds.
//! - Provide type-keyed constructors used by manifests and worlds.
//!
//! # Invariants
//! - A `SystemFactory` always builds an instance of the type its key names.

use crate::model::descriptor::ModDescriptor;
use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Downcast support for trait objects stored in a world.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior unit living in a world.
///
/// Mod-scoped systems live in their mod's world. Global systems live in the
/// host's shared world and may opt into receiving the identity of the mod that
/// placed them.
pub trait System: AsAny {
    /// Called once, right after the instance is inserted into its world.
    fn on_create(&mut self) {}

    /// Per-frame hook, driven by the host scheduler.
    fn update(&mut self) {}

    /// Receives the identity of the registering mod.
    ///
    /// Only invoked on global systems. The default ignores it.
    fn receive_mod_identity(&mut self, _descriptor: &Arc<ModDescriptor>) {}
}

/// Stable key of a system type inside a world.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl SystemKey {
    pub fn of<T: System>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully-qualified Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name, used in logs.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }
}

impl Debug for SystemKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}

type SystemCtor = dyn Fn() -> Box<dyn System> + Send + Sync;

/// Type-keyed constructor for one system type.
#[derive(Clone)]
pub struct SystemFactory {
    key: SystemKey,
    ctor: Arc<SystemCtor>,
}

impl SystemFactory {
    /// Constructor using `T::default()`.
    pub fn of<T: System + Default>() -> Self {
        Self::with(T::default)
    }

    /// Constructor using a caller-provided closure.
    pub fn with<T, F>(ctor: F) -> Self
    where
        T: System,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            key: SystemKey::of::<T>(),
            ctor: Arc::new(move || Box::new(ctor()) as Box<dyn System>),
        }
    }

    pub fn key(&self) -> SystemKey {
        self.key
    }

    pub(crate) fn create(&self) -> Box<dyn System> {
        (self.ctor)()
    }
}

impl Debug for SystemFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemFactory")
            .field("key", &self.key)
            .finish()
    }
}

pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
