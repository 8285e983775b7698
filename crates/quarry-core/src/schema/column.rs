use super::TableId;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    /// The SQL type name as reported by the database catalog.
    pub sql_type: String,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the database supplies a value when the insert omits the column.
    pub has_default: bool,

    /// True if the value is computed by the database and never written.
    pub computed: bool,

    /// True if the column's value changes on every update of the row and is
    /// used to detect lost updates.
    pub concurrency_token: bool,

    /// True if the database assigns the value on insert (identity / serial).
    pub auto_increment: bool,

    /// Position within the primary key, if the column is part of it.
    pub primary_key: Option<usize>,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    pub fn is_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }

    /// Part of the predicate that identifies a row for update and delete.
    pub fn is_identifier(&self) -> bool {
        self.primary_key.is_some() || self.concurrency_token
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
