use anyhow::{bail, Result};
use quarry_core::schema::{ColumnDef, ForeignKeyDef, TableDef};
use quarry_core::Schema;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

const SCHEMA_FILE_VERSION: u32 = 1;

/// Schema snapshot the generator reads tables and foreign keys from
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Schema file format version
    version: u32,

    #[serde(default, rename = "table")]
    pub tables: Vec<TableEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableEntry {
    pub name: String,

    /// Database schema the table lives in, e.g. `dbo`
    pub schema: Option<String>,

    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnEntry>,

    #[serde(default, rename = "foreign_key")]
    pub foreign_keys: Vec<ForeignKeyEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnEntry {
    pub name: String,

    #[serde(rename = "type")]
    pub sql_type: String,

    /// Position of the column within the primary key
    pub primary_key: Option<usize>,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub has_default: bool,

    #[serde(default)]
    pub computed: bool,

    #[serde(default)]
    pub concurrency_token: bool,

    #[serde(default)]
    pub auto_increment: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeyEntry {
    pub name: String,

    /// Referenced table, optionally schema-qualified
    pub references: String,

    /// `[referencing column, referenced column]` pairs
    pub columns: Vec<(String, String)>,
}

impl SchemaFile {
    /// Load a schema file from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("reading schema {}: {err}", path.display()))?;
        contents.parse()
    }

    pub fn into_schema(self) -> Result<Schema> {
        let mut builder = Schema::builder();

        for table in self.tables {
            builder = builder.table(table.into_def());
        }

        Ok(builder.build()?)
    }
}

impl FromStr for SchemaFile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let file: SchemaFile = toml::from_str(s)?;

        if file.version != SCHEMA_FILE_VERSION {
            bail!(
                "Unsupported schema file version: {}. Expected version {}",
                file.version,
                SCHEMA_FILE_VERSION
            );
        }

        Ok(file)
    }
}

impl TableEntry {
    fn into_def(self) -> TableDef {
        let mut def = TableDef::new(self.name);

        if let Some(schema) = self.schema {
            def = def.in_schema(schema);
        }

        for column in self.columns {
            def = def.column(column.into_def());
        }

        for foreign_key in self.foreign_keys {
            def = def.foreign_key(foreign_key.into_def());
        }

        def
    }
}

impl ColumnEntry {
    fn into_def(self) -> ColumnDef {
        let mut def = ColumnDef::new(self.name, self.sql_type);

        if let Some(ordinal) = self.primary_key {
            def = def.primary_key(ordinal);
        }
        if self.nullable {
            def = def.nullable();
        }
        if self.has_default {
            def = def.has_default();
        }
        if self.computed {
            def = def.computed();
        }
        if self.concurrency_token {
            def = def.concurrency_token();
        }
        if self.auto_increment {
            def = def.auto_increment();
        }

        def
    }
}

impl ForeignKeyEntry {
    fn into_def(self) -> ForeignKeyDef {
        self.columns.into_iter().fold(
            ForeignKeyDef::new(self.name, self.references),
            |def, (source, target)| def.column(source, target),
        )
    }
}
