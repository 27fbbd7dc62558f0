//! Errors from the checked operations.

/// The error returned by the checked release of a shared pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseError {
    /// Other owners still reference the value.
    Shared {
        /// Owner count at the time of the call.
        count: usize,
    },
    /// The pointer no longer participates in any owner group (it was moved from).
    Detached,
}

impl core::fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Shared { count } => {
                write!(f, "cannot release a value with {count} owners")
            }
            Self::Detached => f.write_str("pointer has no owner group"),
        }
    }
}

impl std::error::Error for ReleaseError {}
