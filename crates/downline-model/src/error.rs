use std::path::PathBuf;

use thiserror::Error;

use crate::member::{MemberId, Position};

/// Errors raised by organization tree mutations and roster validation.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),

    #[error("member {0} already exists in the tree")]
    DuplicateMember(MemberId),

    #[error("{parent} already has a {position} child")]
    SlotOccupied { parent: MemberId, position: Position },

    #[error("a child cannot be placed at the root position")]
    ChildAtRoot,

    #[error("{member} has more than two children in the roster")]
    TooManyChildren { member: MemberId },

    #[error("{member} declares level {found}, expected {expected}")]
    LevelMismatch {
        member: MemberId,
        expected: u32,
        found: u32,
    },

    #[error("{member} declares position {found}, expected {expected}")]
    PositionMismatch {
        member: MemberId,
        expected: Position,
        found: Position,
    },
}

/// Errors raised when reading or writing a roster file.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write roster file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid roster JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid roster structure: {0}")]
    Structure(#[from] TreeError),
}
