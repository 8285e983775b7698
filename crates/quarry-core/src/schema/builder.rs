use super::{
    Column, ColumnId, ForeignKey, ForeignKeyColumn, ForeignKeyId, Schema, Table, TableId,
};
use crate::{Error, Result};

use std::collections::HashSet;

/// Builds a [`Schema`] from name-based table definitions.
///
/// Foreign keys refer to tables and columns by name and are resolved when
/// [`Builder::build`] runs, so tables may be declared in any order.
#[derive(Debug, Default)]
pub struct Builder {
    tables: Vec<TableDef>,
}

#[derive(Debug, Clone)]
pub struct TableDef {
    schema: Option<String>,
    name: String,
    columns: Vec<ColumnDef>,
    foreign_keys: Vec<ForeignKeyDef>,
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    name: String,
    sql_type: String,
    nullable: bool,
    has_default: bool,
    computed: bool,
    concurrency_token: bool,
    auto_increment: bool,
    primary_key: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyDef {
    name: String,
    references: String,
    columns: Vec<(String, String)>,
}

impl Builder {
    pub fn table(mut self, table: TableDef) -> Self {
        self.tables.push(table);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut seen = HashSet::new();
        for def in &self.tables {
            if !seen.insert((def.schema.as_deref(), def.name.as_str())) {
                return Err(Error::invalid_schema(format!(
                    "table `{}` is declared more than once",
                    def.name
                )));
            }
        }

        let mut schema = Schema::default();

        for (index, def) in self.tables.iter().enumerate() {
            schema.tables.push(def.build_table(TableId(index))?);
        }

        // Foreign keys need every table in place before they can resolve.
        for (index, def) in self.tables.iter().enumerate() {
            let mut foreign_keys = Vec::with_capacity(def.foreign_keys.len());
            for (fk_index, fk) in def.foreign_keys.iter().enumerate() {
                let id = ForeignKeyId {
                    table: TableId(index),
                    index: fk_index,
                };
                foreign_keys.push(fk.resolve(id, &schema)?);
            }
            schema.tables[index].foreign_keys = foreign_keys;
        }

        Ok(schema)
    }
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns: vec![],
            foreign_keys: vec![],
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKeyDef) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    fn build_table(&self, id: TableId) -> Result<Table> {
        let mut names = HashSet::new();
        let mut ordinals = HashSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());

        for (index, def) in self.columns.iter().enumerate() {
            if !names.insert(def.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "column `{}` is declared more than once on table `{}`",
                    def.name, self.name
                )));
            }

            if let Some(ordinal) = def.primary_key {
                if !ordinals.insert(ordinal) {
                    return Err(Error::invalid_schema(format!(
                        "primary key ordinal {ordinal} is used twice on table `{}`",
                        self.name
                    )));
                }
            }

            columns.push(Column {
                id: ColumnId { table: id, index },
                name: def.name.clone(),
                sql_type: def.sql_type.clone(),
                nullable: def.nullable,
                has_default: def.has_default,
                computed: def.computed,
                concurrency_token: def.concurrency_token,
                auto_increment: def.auto_increment,
                primary_key: def.primary_key,
            });
        }

        let mut fk_names = HashSet::new();
        for fk in &self.foreign_keys {
            if !fk_names.insert(fk.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "foreign key `{}` is declared more than once on table `{}`",
                    fk.name, self.name
                )));
            }
        }

        Ok(Table {
            id,
            schema: self.schema.clone(),
            name: self.name.clone(),
            columns,
            foreign_keys: vec![],
        })
    }
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: false,
            has_default: false,
            computed: false,
            concurrency_token: false,
            auto_increment: false,
            primary_key: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn has_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn concurrency_token(mut self) -> Self {
        self.concurrency_token = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as the `ordinal`-th primary key column.
    pub fn primary_key(mut self, ordinal: usize) -> Self {
        self.primary_key = Some(ordinal);
        self
    }
}

impl ForeignKeyDef {
    /// A foreign key declared under the field name `name`, referencing the
    /// table `references` (optionally schema-qualified).
    pub fn new(name: impl Into<String>, references: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            references: references.into(),
            columns: vec![],
        }
    }

    /// Adds a `(referencing column, referenced column)` pair.
    pub fn column(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.columns.push((source.into(), target.into()));
        self
    }

    fn resolve(&self, id: ForeignKeyId, schema: &Schema) -> Result<ForeignKey> {
        let owner = schema.table(id.table);

        if self.columns.is_empty() {
            return Err(Error::invalid_schema(format!(
                "foreign key `{}` on table `{}` has no columns",
                self.name, owner.name
            )));
        }

        let target = schema.find_table(&self.references).map_err(|err| {
            err.context(crate::err!(
                "resolving foreign key `{}` on table `{}`",
                self.name,
                owner.name
            ))
        })?;

        let mut columns = Vec::with_capacity(self.columns.len());
        for (source, referenced) in &self.columns {
            columns.push(ForeignKeyColumn {
                source: owner.column_by_name(source)?.id,
                target: target.column_by_name(referenced)?.id,
            });
        }

        Ok(ForeignKey {
            id,
            name: self.name.clone(),
            target: target.id,
            columns,
        })
    }
}
