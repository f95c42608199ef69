//! Status codes returned by every C entry point.

use speechkit_core::ErrorKind;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpxStatus {
    Ok = 0,
    InvalidArg = 1,
    InvalidHandle = 2,
    InvalidState = 3,
    RuntimeError = 4,
    OutOfResources = 5,
    UnhandledPanic = 6,
}

impl SpxStatus {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl From<ErrorKind> for SpxStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidArgument => Self::InvalidArg,
            ErrorKind::NotFound => Self::InvalidHandle,
            ErrorKind::InvalidState => Self::InvalidState,
            ErrorKind::Runtime => Self::RuntimeError,
            ErrorKind::OutOfResources => Self::OutOfResources,
        }
    }
}
