//! Error types shared by platform hooks.

use core::fmt::{self, Display};

/// Outcome of a platform service hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// The capability exists on this machine but no driver for it is
    /// linked into this build.
    Unsupported,
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Unsupported => f.write_str("operation not supported in this build"),
        }
    }
}
