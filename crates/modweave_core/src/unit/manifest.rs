//! Declarative code unit.
//!
//! # Responsibility
//! - Let a mod declare its bootstraps and systems explicitly.
//! - Model loader failures for types that cannot be resolved.
//!
//! # Invariants
//! - `load_types` returns declared types in declaration order.
//! - Broken declarations turn the load into a `PartialTypeLoad`.

use crate::unit::code_unit::{CodeUnit, CodeUnitId, PartialTypeLoad, TypeLoadFailure};
use crate::unit::type_info::TypeDescriptor;

/// Code unit backed by an explicit type list.
#[derive(Debug, Clone)]
pub struct CodeUnitManifest {
    id: CodeUnitId,
    name: String,
    types: Vec<TypeDescriptor>,
    broken: Vec<TypeLoadFailure>,
}

impl CodeUnitManifest {
    /// Creates an empty manifest with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(CodeUnitId::new(), name)
    }

    /// Creates an empty manifest with a loader-provided id.
    pub fn with_id(id: CodeUnitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            types: Vec::new(),
            broken: Vec::new(),
        }
    }

    /// Declares one resolvable type.
    pub fn declare(mut self, entry: TypeDescriptor) -> Self {
        self.types.push(entry);
        self
    }

    /// Declares one type that fails to resolve with `cause`.
    pub fn declare_broken(
        mut self,
        type_name: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        self.broken.push(TypeLoadFailure {
            type_name: type_name.into(),
            cause: cause.into(),
        });
        self
    }
}

impl CodeUnit for CodeUnitManifest {
    fn id(&self) -> CodeUnitId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn load_types(&self) -> Result<Vec<TypeDescriptor>, PartialTypeLoad> {
        if self.broken.is_empty() {
            return Ok(self.types.clone());
        }
        Err(PartialTypeLoad {
            loaded: self.types.clone(),
            failures: self.broken.clone(),
        })
    }
}
