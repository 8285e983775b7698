use super::{ColumnId, TableId};

use std::fmt;

/// A foreign key owned by the referencing table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub id: ForeignKeyId,

    /// The declared field name joins refer to the key by.
    pub name: String,

    /// The referenced table.
    pub target: TableId,

    /// Column pairs, in key order.
    pub columns: Vec<ForeignKeyColumn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyColumn {
    /// Column on the referencing table.
    pub source: ColumnId,

    /// Column on the referenced table.
    pub target: ColumnId,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct ForeignKeyId {
    /// The owning (referencing) table.
    pub table: TableId,
    pub index: usize,
}

impl ForeignKey {
    pub fn source(&self) -> TableId {
        self.id.table
    }
}

impl fmt::Debug for ForeignKeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ForeignKeyId({}/{})", self.table.0, self.index)
    }
}
