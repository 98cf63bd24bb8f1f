//! Mod identity model.
//!
//! # Responsibility
//! - Define the records that identify a registered mod.
//!
//! # Invariants
//! - A descriptor lives as long as the registry that created it.

pub mod descriptor;
