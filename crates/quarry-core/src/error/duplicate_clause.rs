use super::Error;

/// Error when an optional query clause is specified more than once.
#[derive(Debug)]
pub(super) struct DuplicateClause {
    clause: &'static str,
}

impl std::error::Error for DuplicateClause {}

impl core::fmt::Display for DuplicateClause {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate clause: {} was already specified for this query",
            self.clause
        )
    }
}

impl Error {
    /// Creates a duplicate clause error.
    pub fn duplicate_clause(clause: &'static str) -> Error {
        Error::from(super::ErrorKind::DuplicateClause(DuplicateClause { clause }))
    }

    /// Returns `true` if this error is a duplicate clause error.
    pub fn is_duplicate_clause(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::DuplicateClause(_)))
    }
}
