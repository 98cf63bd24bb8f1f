//! Code units and type discovery.
//!
//! # Responsibility
//! - Define how a loader exposes the types of one compiled unit.
//! - Discover and filter the types the registration pipeline instantiates.
//!
//! # Invariants
//! - Partial load failures are recovered inside discovery.

pub mod code_unit;
pub mod discovery;
pub mod manifest;
pub mod type_info;
