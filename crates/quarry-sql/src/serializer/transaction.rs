use super::Serializer;

use quarry_core::Result;

/// A transaction control operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Start {
        isolation: Option<IsolationLevel>,
        read_only: bool,
    },
    Commit,
    Rollback,
    Savepoint(usize),
    ReleaseSavepoint(usize),
    RollbackToSavepoint(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl Serializer<'_> {
    /// Serialize a transaction control operation to a SQL string.
    ///
    /// Savepoints are named `sp_{id}`.
    pub fn serialize_transaction(&self, op: &Transaction) -> Result<String> {
        Ok(match op {
            Transaction::Start {
                isolation,
                read_only,
            } => self.dialect.begin_transaction(*isolation, *read_only)?,
            Transaction::Commit => self.dialect.commit_transaction(),
            Transaction::Rollback => self.dialect.rollback_transaction(),
            Transaction::Savepoint(id) => self.dialect.savepoint(&savepoint_name(*id)),
            Transaction::ReleaseSavepoint(id) => {
                self.dialect.release_savepoint(&savepoint_name(*id))?
            }
            Transaction::RollbackToSavepoint(id) => {
                self.dialect.rollback_to_savepoint(&savepoint_name(*id))
            }
        })
    }
}

fn savepoint_name(id: usize) -> String {
    format!("sp_{id}")
}
