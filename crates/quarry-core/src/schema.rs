mod builder;
pub use builder::{Builder, ColumnDef, ForeignKeyDef, TableDef};

mod column;
pub use column::{Column, ColumnId};

mod foreign_key;
pub use foreign_key::{ForeignKey, ForeignKeyColumn, ForeignKeyId};

mod naming;
pub use naming::{DefaultNaming, NamingConvention};

mod table;
pub use table::{Table, TableId};

use crate::{Error, Result};

/// The relational schema a generation run works against.
///
/// Produced once by schema extraction and treated as read-only input for the
/// lifetime of the run.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        self.table(id.table)
            .columns
            .get(id.index)
            .expect("invalid column ID")
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        self.table(id.table)
            .foreign_keys
            .get(id.index)
            .expect("invalid foreign key ID")
    }

    /// Fallible lookup used when the ID comes from caller-built IR.
    pub fn get_table(&self, id: TableId) -> Result<&Table> {
        self.tables
            .get(id.0)
            .ok_or_else(|| Error::schema_lookup("table", format!("{id:?}"), "this schema"))
    }

    /// Finds a table by name.
    ///
    /// The name may be schema-qualified (`dbo.orders`). An unqualified name
    /// must match exactly one table.
    pub fn find_table(&self, name: &str) -> Result<&Table> {
        let (schema, name) = match name.split_once('.') {
            Some((schema, name)) => (Some(schema), name),
            None => (None, name),
        };

        let mut found = self.tables.iter().filter(|table| {
            table.name == name && (schema.is_none() || table.schema.as_deref() == schema)
        });

        match (found.next(), found.next()) {
            (Some(table), None) => Ok(table),
            (Some(_), Some(_)) => Err(Error::invalid_schema(format!(
                "table name `{name}` is ambiguous; qualify it with its schema"
            ))),
            (None, _) => Err(Error::schema_lookup("table", name, "this schema")),
        }
    }
}
