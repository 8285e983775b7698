use super::{Column, ColumnId, ForeignKey};
use crate::{Error, Result};

use std::fmt;

/// A database table
#[derive(Debug, Clone)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// The database schema (namespace) the table lives in, if any.
    pub schema: Option<String>,

    /// Name of the table
    pub name: String,

    /// The table's columns, in declaration order
    pub columns: Vec<Column>,

    /// Foreign keys owned by this table
    pub foreign_keys: Vec<ForeignKey>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl Table {
    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        &self.columns[id.into().index]
    }

    pub fn column_by_name(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| Error::schema_lookup("column", name, self.describe()))
    }

    /// Finds a foreign key by its declared field name.
    pub fn foreign_key_by_name(&self, name: &str) -> Result<&ForeignKey> {
        self.foreign_keys
            .iter()
            .find(|fk| fk.name == name)
            .ok_or_else(|| Error::schema_lookup("foreign key", name, self.describe()))
    }

    /// Primary key columns, ordered by their key ordinal.
    pub fn primary_key_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        let mut columns: Vec<_> = self
            .columns
            .iter()
            .filter(|column| column.primary_key.is_some())
            .collect();
        columns.sort_by_key(|column| column.primary_key);
        columns.into_iter()
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|column| column.primary_key.is_some())
    }

    /// The column whose value the database assigns on insert, if any.
    pub fn identity_column(&self) -> Option<&Column> {
        self.columns.iter().find(|column| column.auto_increment)
    }

    /// Primary key columns followed by concurrency-token columns that are not
    /// already part of the key.
    pub fn identifier_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<_> = self.primary_key_columns().collect();
        columns.extend(
            self.columns
                .iter()
                .filter(|column| column.concurrency_token && column.primary_key.is_none()),
        );
        columns
    }

    /// `table `name`` or `table `schema.name`` for messages.
    pub fn describe(&self) -> String {
        match &self.schema {
            Some(schema) => format!("table `{schema}.{}`", self.name),
            None => format!("table `{}`", self.name),
        }
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> Self {
        value.id
    }
}
