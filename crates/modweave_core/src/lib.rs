//! Runtime mod registry for modweave.
//! Registers mods, runs their bootstraps and composes their systems into the
//! host's worlds.

pub mod config;
pub mod logging;
pub mod model;
pub mod registry;
pub mod unit;
pub mod world;

pub use config::{ConfigError, ExternalLoadPolicy, LogLevel, LogSettings, RuntimeConfig};
pub use logging::{init_logging, logging_status};
pub use model::descriptor::{IntegrationKind, ModDescriptor, ModDescriptorData, ModKind};
pub use registry::bootstrap::{BootstrapFactory, ModBootstrap};
pub use registry::composer::CompositionReport;
pub use registry::error::{ModError, ModResult, NotFoundError, SequenceError};
pub use registry::events::{Observers, RegistrationEvents, SubscriptionId};
pub use registry::gate::GateState;
pub use registry::manager::{InternalRegistration, ModManager};
pub use unit::code_unit::{CodeUnit, CodeUnitId, PartialTypeLoad, TypeLoadFailure};
pub use unit::discovery::{
    discover_types, DiscoveredTypes, TypeFilter, TypeLoadDiagnostic, TypePredicate,
};
pub use unit::manifest::CodeUnitManifest;
pub use unit::type_info::{BaseClass, TypeDescriptor, TypeLineage};
pub use world::context::World;
pub use world::host::{DefaultHost, SystemHost};
pub use world::system::{System, SystemFactory, SystemKey};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
