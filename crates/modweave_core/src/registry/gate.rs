//! One-shot internal registration gate.
//!
//! # Invariants
//! - Transitions only go `Closed -> Open -> Exhausted`.
//! - Only one session can ever be opened per gate.

use crate::registry::error::SequenceError;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No session has been opened yet.
    Closed,
    /// The single session is open.
    Open,
    /// The session was opened and ended; the gate never reopens.
    Exhausted,
}

#[derive(Debug)]
pub struct InternalRegistrationGate {
    state: GateState,
}

impl InternalRegistrationGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Closed,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Opens the single session.
    pub fn open(&mut self) -> Result<(), SequenceError> {
        if self.state != GateState::Closed {
            return Err(SequenceError::AlreadyConsumed);
        }
        self.state = GateState::Open;
        info!("event=internal_registration module=registry status=open");
        Ok(())
    }

    /// Marks the gate as consumed. No-op unless open.
    pub fn exhaust(&mut self) {
        if self.state == GateState::Open {
            self.state = GateState::Exhausted;
            info!("event=internal_registration module=registry status=exhausted");
        }
    }
}

impl Default for InternalRegistrationGate {
    fn default() -> Self {
        Self::new()
    }
}
