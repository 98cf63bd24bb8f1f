//! Mod registration and composition.
//!
//! # Responsibility
//! - Assign mod identities and bind code units to them.
//! - Run bootstraps, then place systems into mod and shared worlds.
//! - Gate first-party registration to a single session.
//! - Notify observers once a mod is composed.
//!
//! # Invariants
//! - Registration is synchronous and runs to completion on the caller's thread.
//! - Mods are never unregistered.

pub mod bootstrap;
pub mod composer;
pub mod error;
pub mod events;
pub mod gate;
pub mod identity;
pub mod manager;
