use super::CrudKind;
use crate::{Error, Result};

/// Outcome of a rows-affected probe run after an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsAffected {
    Count(u64),

    /// The dialect cannot report a count inline. Treated as success.
    Unknown,
}

/// A mutation that did not affect exactly one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffectedViolation<'a> {
    pub kind: CrudKind,
    pub table: &'a str,
    pub rows_affected: u64,
}

/// Decides what happens when an update or delete affects zero or several
/// rows.
pub trait RowsAffectedHandler {
    fn on_violation(&self, violation: &RowsAffectedViolation<'_>) -> Result<()>;
}

/// Fails with a concurrency-conflict error. This is the default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConcurrencyConflictHandler;

/// Accepts every outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreViolations;

impl RowsAffected {
    /// Interprets the value returned by a dialect's probe. Negative values are
    /// the "cannot report" sentinel.
    pub fn from_probe(value: i64) -> RowsAffected {
        match u64::try_from(value) {
            Ok(count) => RowsAffected::Count(count),
            Err(_) => RowsAffected::Unknown,
        }
    }

    /// Applies the one-row contract, routing violations through `handler`.
    pub fn verify(
        self,
        kind: CrudKind,
        table: &str,
        handler: &dyn RowsAffectedHandler,
    ) -> Result<()> {
        match self {
            RowsAffected::Count(1) => Ok(()),
            RowsAffected::Count(rows_affected) => handler.on_violation(&RowsAffectedViolation {
                kind,
                table,
                rows_affected,
            }),
            RowsAffected::Unknown => {
                tracing::warn!(%kind, table, "rows affected not reported by dialect; accepting");
                Ok(())
            }
        }
    }
}

impl RowsAffectedHandler for ConcurrencyConflictHandler {
    fn on_violation(&self, violation: &RowsAffectedViolation<'_>) -> Result<()> {
        Err(Error::concurrency_conflict(format!(
            "expected 1 row affected by {} on `{}`, got {}",
            violation.kind, violation.table, violation.rows_affected
        )))
    }
}

impl RowsAffectedHandler for IgnoreViolations {
    fn on_violation(&self, violation: &RowsAffectedViolation<'_>) -> Result<()> {
        tracing::debug!(?violation, "ignoring rows-affected violation");
        Ok(())
    }
}

impl<F> RowsAffectedHandler for F
where
    F: Fn(&RowsAffectedViolation<'_>) -> Result<()>,
{
    fn on_violation(&self, violation: &RowsAffectedViolation<'_>) -> Result<()> {
        self(violation)
    }
}
