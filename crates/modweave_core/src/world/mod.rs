//! Execution contexts ("worlds") and the host boundary.
//!
//! # Responsibility
//! - Hold system instances per world, keyed by type.
//! - Create one isolated world per mod on demand.
//! - Define the contract the host scheduler fulfils.
//!
//! # Invariants
//! - Each mod has at most one isolated world, kept for the registry lifetime.
//! - The shared world belongs to the host.

pub mod context;
pub mod host;
pub mod provider;
pub mod system;
