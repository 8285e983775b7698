use super::{Expr, TableRefId};

/// References a column of a table bound in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprColumn {
    pub table: TableRefId,

    /// Index of the column within its table.
    pub column: usize,
}

impl Expr {
    pub fn column(table: TableRefId, column: usize) -> Self {
        ExprColumn { table, column }.into()
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}
