use super::{Expr, ExprColumn, TableRefId};

/// Tests whether a table's entity is absent from the row.
///
/// Compiles to a null check over every primary key column of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprEntityNullCheck {
    pub table: TableRefId,

    /// `false` for "is not null".
    pub is_null: bool,
}

/// `column IS [NOT] NULL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprColumnNullCheck {
    pub table: TableRefId,
    pub column: usize,

    /// `false` for "is not null".
    pub is_null: bool,
}

impl Expr {
    pub fn entity_is_null(table: TableRefId) -> Self {
        ExprEntityNullCheck {
            table,
            is_null: true,
        }
        .into()
    }

    pub fn entity_is_not_null(table: TableRefId) -> Self {
        ExprEntityNullCheck {
            table,
            is_null: false,
        }
        .into()
    }

    pub fn is_null(column: ExprColumn) -> Self {
        ExprColumnNullCheck {
            table: column.table,
            column: column.column,
            is_null: true,
        }
        .into()
    }

    pub fn is_not_null(column: ExprColumn) -> Self {
        ExprColumnNullCheck {
            table: column.table,
            column: column.column,
            is_null: false,
        }
        .into()
    }
}

impl From<ExprEntityNullCheck> for Expr {
    fn from(value: ExprEntityNullCheck) -> Self {
        Self::EntityNullCheck(value)
    }
}

impl From<ExprColumnNullCheck> for Expr {
    fn from(value: ExprColumnNullCheck) -> Self {
        Self::ColumnNullCheck(value)
    }
}
