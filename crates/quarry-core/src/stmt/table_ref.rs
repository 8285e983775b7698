use crate::schema::TableId;

use std::fmt;

/// A table bound to a query-local alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    /// Position in the query's table arena; also determines the alias.
    pub id: TableRefId,

    /// The schema table being referenced.
    pub table: TableId,

    /// True when the table is only reachable through a left join, so a result
    /// row may carry no entity for it.
    pub may_be_null: bool,
}

/// Index of a [`TableRef`] in [`QuerySpec::tables`](super::QuerySpec::tables).
///
/// Displays as the table's alias (`t0`, `t1`, ...).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableRefId(pub usize);

impl TableRef {
    pub fn root(table: TableId) -> TableRef {
        TableRef {
            id: TableRefId(0),
            table,
            may_be_null: false,
        }
    }
}

impl fmt::Display for TableRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Debug for TableRefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableRefId({})", self.0)
    }
}
