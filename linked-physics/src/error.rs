use crate::body::BodyId;
use thiserror::Error;

/// Errors raised by a dynamics world or by the linked layer on top of it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// A body with this id is already in the world.
    #[error("body {0} is already in the world")]
    DuplicateBody(BodyId),

    /// Destroy was asked for a body the world does not have.
    #[error("body {0} is not in the world")]
    MissingBody(BodyId),

    /// Auto-step was called before the world was started.
    #[error("world is not running")]
    NotRunning,

    #[error("invalid timestep: {0}")]
    InvalidTimestep(f32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A fatal invariant violation happened earlier; the world is unusable.
    #[error("linked world is poisoned: {cause}")]
    Poisoned { cause: Box<WorldError> },
}

pub type Result<T> = std::result::Result<T, WorldError>;
