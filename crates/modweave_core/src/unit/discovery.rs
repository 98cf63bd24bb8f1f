//! Type discovery over code units.
//!
//! # Responsibility
//! - Enumerate a unit's types, recovering from partial load failures.
//! - Filter types by structural predicates.
//!
//! # Invariants
//! - Discovery never returns an error; failures become diagnostics.
//! - Each call reloads the unit, so enumeration is restartable.
//! - Predicates have no side effects.

use crate::unit::code_unit::{CodeUnit, CodeUnitId};
use crate::unit::type_info::{BaseClass, TypeDescriptor};
use log::warn;
use std::fmt::{Display, Formatter};

/// Record of one type that failed to resolve during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLoadDiagnostic {
    pub unit_id: CodeUnitId,
    pub unit_name: String,
    pub type_name: String,
    pub cause: String,
}

impl Display for TypeLoadDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "type `{}` in unit `{}` failed to load: {}",
            self.type_name, self.unit_name, self.cause
        )
    }
}

/// Resolved types of one unit, in loader order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredTypes {
    types: Vec<TypeDescriptor>,
}

impl DiscoveredTypes {
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeDescriptor> {
        self.types.iter()
    }

    /// Keeps only the types accepted by `filter`, preserving order.
    pub fn filter(self, filter: &TypeFilter) -> Self {
        Self {
            types: self
                .types
                .into_iter()
                .filter(|entry| filter.matches(entry))
                .collect(),
        }
    }
}

impl IntoIterator for DiscoveredTypes {
    type Item = TypeDescriptor;
    type IntoIter = std::vec::IntoIter<TypeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.into_iter()
    }
}

/// Enumerates the resolvable types of `unit`.
///
/// # Side effects
/// - Logs each failing type at `warn`.
/// - Appends one entry per failing type to `diagnostics`.
pub fn discover_types(
    unit: &dyn CodeUnit,
    diagnostics: &mut Vec<TypeLoadDiagnostic>,
) -> DiscoveredTypes {
    match unit.load_types() {
        Ok(types) => DiscoveredTypes { types },
        Err(partial) => {
            warn!(
                "event=type_discovery module=unit status=partial unit={} loaded={} failed={}",
                unit.name(),
                partial.loaded.len(),
                partial.failures.len()
            );
            for failure in partial.failures {
                warn!(
                    "event=type_load module=unit status=error unit={} type={} cause={}",
                    unit.name(),
                    failure.type_name,
                    failure.cause
                );
                diagnostics.push(TypeLoadDiagnostic {
                    unit_id: unit.id(),
                    unit_name: unit.name().to_string(),
                    type_name: failure.type_name,
                    cause: failure.cause,
                });
            }
            DiscoveredTypes {
                types: partial.loaded,
            }
        }
    }
}

/// Structural predicate over a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePredicate {
    /// Not abstract.
    Concrete,
    /// No open type parameters.
    NonGeneric,
    /// Lacks the opt-out marker.
    NotOptedOut,
    /// Strict subclass of the base.
    SubclassOf(BaseClass),
}

impl TypePredicate {
    pub fn matches(self, entry: &TypeDescriptor) -> bool {
        let flags = entry.flags();
        match self {
            Self::Concrete => !flags.is_abstract,
            Self::NonGeneric => !flags.is_generic,
            Self::NotOptedOut => !flags.auto_creation_disabled,
            Self::SubclassOf(base) => entry.derives_from(base),
        }
    }
}

/// Conjunction of predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    predicates: Vec<TypePredicate>,
}

impl TypeFilter {
    /// Filter accepting every type.
    pub fn any() -> Self {
        Self::default()
    }

    /// Concrete, non-generic, not opted-out subclasses of `base`.
    pub fn instantiable(base: BaseClass) -> Self {
        Self::any()
            .and(TypePredicate::SubclassOf(base))
            .and(TypePredicate::Concrete)
            .and(TypePredicate::NonGeneric)
            .and(TypePredicate::NotOptedOut)
    }

    /// Types the bootstrap runner instantiates.
    pub fn bootstraps() -> Self {
        Self::instantiable(BaseClass::Bootstrap)
    }

    /// Types the system composer instantiates.
    pub fn systems() -> Self {
        Self::instantiable(BaseClass::System)
    }

    pub fn and(mut self, predicate: TypePredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn matches(&self, entry: &TypeDescriptor) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(entry))
    }
}
