//! Registry error types.

use crate::unit::code_unit::CodeUnitId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ModResult<T> = Result<T, ModError>;

/// Query for an unbound code unit or an unknown identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    CodeUnit(CodeUnitId),
    NameId(String),
}

impl Display for NotFoundError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodeUnit(id) => write!(f, "code unit is not bound to any mod: {id}"),
            Self::NameId(value) => write!(f, "no mod registered with name id: {value}"),
        }
    }
}

impl Error for NotFoundError {}

/// Internal registration used out of sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// The single internal registration session was already opened.
    AlreadyConsumed,
    /// The session was ended; no more internal mods can be added.
    SessionEnded,
}

impl Display for SequenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyConsumed => write!(
                f,
                "internal registration already consumed; no new internal mods can be registered"
            ),
            Self::SessionEnded => write!(f, "internal registration session has ended"),
        }
    }
}

impl Error for SequenceError {}

/// Error returned by mod manager operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModError {
    NotFound(NotFoundError),
    Sequence(SequenceError),
    EmptyCodeUnits,
}

impl Display for ModError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(err) => write!(f, "{err}"),
            Self::Sequence(err) => write!(f, "{err}"),
            Self::EmptyCodeUnits => {
                write!(f, "a mod must be registered with at least one code unit")
            }
        }
    }
}

impl Error for ModError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(err) => Some(err),
            Self::Sequence(err) => Some(err),
            Self::EmptyCodeUnits => None,
        }
    }
}

impl From<NotFoundError> for ModError {
    fn from(value: NotFoundError) -> Self {
        Self::NotFound(value)
    }
}

impl From<SequenceError> for ModError {
    fn from(value: SequenceError) -> Self {
        Self::Sequence(value)
    }
}
