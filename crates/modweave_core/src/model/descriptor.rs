//! Mod descriptor model.
//!
//! # Responsibility
//! - Define the identity record assigned to every registered mod.
//! - Classify mods by kind and integration mode.
//!
//! # Invariants
//! - `index` is assigned once by the identity registry and never changes.
//! - Descriptors are immutable after creation and shared as `Arc`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Content category of a mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ModKind {
    /// Package of type definitions contributed through code units.
    Package,
}

/// How a mod is wired into the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationKind {
    /// Shipped with the host and composed directly.
    Integrated,
    /// First-party mod registered through the internal registration gate.
    InternalAndIntegrated,
    /// Third-party mod that is composed like an integrated one.
    ExternalAndIntegrated,
    /// Third-party mod that needs the external load step.
    External,
}

impl IntegrationKind {
    /// Returns whether the mod is composed without the external load step.
    pub fn is_integrated(self) -> bool {
        matches!(
            self,
            Self::Integrated | Self::InternalAndIntegrated | Self::ExternalAndIntegrated
        )
    }

    /// Stable string id used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integrated => "integrated",
            Self::InternalAndIntegrated => "internal_and_integrated",
            Self::ExternalAndIntegrated => "external_and_integrated",
            Self::External => "external",
        }
    }
}

/// Caller-supplied metadata for one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDescriptorData {
    /// Human-readable name. Host-defined semantics.
    pub display_name: String,
    /// Host-defined identifier. Not checked for uniqueness.
    pub name_id: String,
    pub kind: ModKind,
    pub integration: IntegrationKind,
}

impl ModDescriptorData {
    /// Metadata for a `Package` mod.
    pub fn package(
        display_name: impl Into<String>,
        name_id: impl Into<String>,
        integration: IntegrationKind,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            name_id: name_id.into(),
            kind: ModKind::Package,
            integration,
        }
    }
}

/// Identity and metadata of one registered mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDescriptor {
    /// Registration position, starting at zero.
    pub index: usize,
    pub display_name: String,
    pub name_id: String,
    pub kind: ModKind,
    pub integration: IntegrationKind,
}

impl ModDescriptor {
    /// Builds a descriptor at `index` from caller metadata.
    ///
    /// Only the identity registry should call this; it owns index allocation.
    pub(crate) fn new(data: ModDescriptorData, index: usize) -> Self {
        Self {
            index,
            display_name: data.display_name,
            name_id: data.name_id,
            kind: data.kind,
            integration: data.integration,
        }
    }
}

impl Display for ModDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{} ({})", self.name_id, self.index, self.display_name)
    }
}
