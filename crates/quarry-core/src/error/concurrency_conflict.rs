use super::Error;

/// Error when a mutation did not affect exactly one row.
///
/// This occurs when:
/// - An update or delete matched no row, usually because the concurrency
///   token is stale or the row was deleted
/// - An update or delete matched more than one row
///
/// This is the default outcome of a rows-affected violation.
#[derive(Debug)]
pub(super) struct ConcurrencyConflict {
    message: Box<str>,
}

impl std::error::Error for ConcurrencyConflict {}

impl core::fmt::Display for ConcurrencyConflict {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "concurrency conflict: {}", self.message)
    }
}

impl Error {
    /// Creates a concurrency conflict error.
    pub fn concurrency_conflict(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ConcurrencyConflict(ConcurrencyConflict {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a concurrency conflict error.
    pub fn is_concurrency_conflict(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::ConcurrencyConflict(_)))
    }
}
