//! Code unit loader contract.

use crate::unit::type_info::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identity of one loadable code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CodeUnitId(Uuid);

impl CodeUnitId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an id supplied by the loader.
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CodeUnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CodeUnitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One loadable compiled module contributed by a mod.
pub trait CodeUnit {
    fn id(&self) -> CodeUnitId;

    /// Human-readable unit name for diagnostics.
    fn name(&self) -> &str;

    /// Resolves the contained types.
    ///
    /// Returns `Err(PartialTypeLoad)` when some types cannot be resolved; the
    /// error still carries every type that did resolve.
    fn load_types(&self) -> Result<Vec<TypeDescriptor>, PartialTypeLoad>;
}

/// One type that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLoadFailure {
    pub type_name: String,
    pub cause: String,
}

/// Partial failure while resolving a unit's types.
#[derive(Debug, Clone)]
pub struct PartialTypeLoad {
    pub loaded: Vec<TypeDescriptor>,
    pub failures: Vec<TypeLoadFailure>,
}

impl Display for PartialTypeLoad {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} type(s) failed to load, {} resolved",
            self.failures.len(),
            self.loaded.len()
        )
    }
}

impl Error for PartialTypeLoad {}
