use thiserror::Error;

use crate::handles::HandleKind;

/// All errors produced by speechkit-core.
#[derive(Debug, Error)]
pub enum SpeechKitError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid {kind} handle")]
    InvalidHandle { kind: HandleKind },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("{kind} handle table is exhausted")]
    OutOfResources { kind: HandleKind },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification used at the C boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InvalidState,
    Runtime,
    OutOfResources,
}

impl SpeechKitError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidHandle { .. } => ErrorKind::NotFound,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Runtime(_) | Self::Other(_) => ErrorKind::Runtime,
            Self::OutOfResources { .. } => ErrorKind::OutOfResources,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpeechKitError>;
