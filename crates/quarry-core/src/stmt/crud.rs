use super::{Value, ValueRecord};
use crate::{
    schema::{Column, Schema, Table, TableId},
    Result,
};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudKind {
    Insert,
    Update,
    Delete,
}

/// Asks for the statement that inserts, updates or deletes one record.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudRequest {
    pub kind: CrudKind,
    pub table: TableId,

    /// Values of the record being written, indexed by column. When present,
    /// the insert-defaults policy sees the proposed value of each defaultable
    /// column.
    pub instance: Option<ValueRecord>,
}

/// Decides whether an insert writes an explicit value to a column the
/// database could default.
pub trait InsertDefaultPolicy {
    /// `instance` and `proposed` are `None` when the statement is compiled
    /// ahead of time, without a record.
    fn include(
        &self,
        table: &Table,
        column: &Column,
        instance: Option<&ValueRecord>,
        proposed: Option<&Value>,
    ) -> bool;

    /// The decision a generated insert makes for `column`. `None` when the
    /// policy needs more of the record than generated code can evaluate.
    fn generated(&self, table: &Table, column: &Column) -> Option<GeneratedDefault> {
        let _ = (table, column);
        None
    }
}

/// What a generated insert does with one defaultable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedDefault {
    /// Write the record's value.
    Write,

    /// Leave the column to the database.
    Skip,

    /// Decide per record: write the value unless it
    /// [looks like a default](Value::looks_default).
    WhenNonDefault,
}

/// Built-in insert-defaults policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertDefaults {
    /// Always write the record's value, overriding database defaults.
    Always,

    /// Never write defaultable columns; the database always supplies them.
    #[default]
    Never,

    /// Write the record's value only when it does not look like an unset
    /// value (see [`Value::looks_default`]).
    WhenNonDefault,
}

impl CrudRequest {
    pub fn insert(table: impl Into<TableId>) -> CrudRequest {
        CrudRequest::new(CrudKind::Insert, table)
    }

    pub fn update(table: impl Into<TableId>) -> CrudRequest {
        CrudRequest::new(CrudKind::Update, table)
    }

    pub fn delete(table: impl Into<TableId>) -> CrudRequest {
        CrudRequest::new(CrudKind::Delete, table)
    }

    /// Looks the table up by name.
    pub fn for_table(schema: &Schema, kind: CrudKind, table: &str) -> Result<CrudRequest> {
        Ok(CrudRequest::new(kind, schema.find_table(table)?))
    }

    pub fn with_instance(mut self, instance: impl Into<ValueRecord>) -> CrudRequest {
        self.instance = Some(instance.into());
        self
    }

    fn new(kind: CrudKind, table: impl Into<TableId>) -> CrudRequest {
        CrudRequest {
            kind,
            table: table.into(),
            instance: None,
        }
    }
}

impl CrudKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CrudKind::Insert => "insert",
            CrudKind::Update => "update",
            CrudKind::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InsertDefaultPolicy for InsertDefaults {
    fn include(
        &self,
        _table: &Table,
        _column: &Column,
        _instance: Option<&ValueRecord>,
        proposed: Option<&Value>,
    ) -> bool {
        match self {
            InsertDefaults::Always => true,
            InsertDefaults::Never => false,
            InsertDefaults::WhenNonDefault => proposed.is_some_and(|value| !value.looks_default()),
        }
    }

    fn generated(&self, _table: &Table, _column: &Column) -> Option<GeneratedDefault> {
        Some(match self {
            InsertDefaults::Always => GeneratedDefault::Write,
            InsertDefaults::Never => GeneratedDefault::Skip,
            InsertDefaults::WhenNonDefault => GeneratedDefault::WhenNonDefault,
        })
    }
}

impl<F> InsertDefaultPolicy for F
where
    F: Fn(&Table, &Column, Option<&ValueRecord>, Option<&Value>) -> bool,
{
    fn include(
        &self,
        table: &Table,
        column: &Column,
        instance: Option<&ValueRecord>,
        proposed: Option<&Value>,
    ) -> bool {
        self(table, column, instance, proposed)
    }
}
