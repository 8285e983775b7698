use crate::QueryEntry;
use anyhow::Result;
use quarry_core::stmt::InsertDefaults;
use quarry_sql::{CompileOptions, Dialect, Postgresql, SqlServer, Sqlite};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for Quarry CLI operations, usually read from `quarry.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQL dialect the generated statements target
    pub dialect: DialectName,

    /// Path to the schema snapshot
    pub schema: Option<PathBuf>,

    /// File the generated code is written to. Standard output when unset.
    pub output: Option<PathBuf>,

    /// Parameter names the generated methods must not use
    pub reserved_names: Vec<String>,

    /// Prepended to reserved parameter names
    pub rename_prefix: String,

    /// Which defaultable columns inserts write
    pub insert_defaults: InsertDefaultsSetting,

    /// Queries emitted as methods of their root table's record type
    #[serde(rename = "query")]
    pub queries: Vec<QueryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DialectName {
    #[default]
    Sqlite,
    Postgresql,
    SqlServer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertDefaultsSetting {
    Always,
    #[default]
    Never,
    WhenNonDefault,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DialectName::default(),
            schema: None,
            output: None,
            reserved_names: vec![],
            rename_prefix: "p_".to_string(),
            insert_defaults: InsertDefaultsSetting::default(),
            queries: vec![],
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config file. Relative paths inside it are resolved against the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("reading config {}: {err}", path.display()))?;
        let mut config: Config = contents.parse()?;

        if let Some(base) = path.parent() {
            config.schema = config.schema.map(|schema| base.join(schema));
            config.output = config.output.map(|output| base.join(output));
        }

        Ok(config)
    }

    /// Set the dialect
    pub fn dialect(mut self, dialect: DialectName) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the schema snapshot path
    pub fn schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema = Some(path.into());
        self
    }

    /// Set the output path
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Reserve a parameter name
    pub fn reserved_name(mut self, name: impl Into<String>) -> Self {
        self.reserved_names.push(name.into());
        self
    }

    /// Set the prefix used to rename reserved parameters
    pub fn rename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rename_prefix = prefix.into();
        self
    }

    /// Set the insert-defaults policy
    pub fn insert_defaults(mut self, setting: InsertDefaultsSetting) -> Self {
        self.insert_defaults = setting;
        self
    }

    /// Add a query
    pub fn query(mut self, query: QueryEntry) -> Self {
        self.queries.push(query);
        self
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::new()
            .reserved_names(self.reserved_names.clone())
            .rename_prefix(self.rename_prefix.clone())
            .insert_defaults(self.insert_defaults.policy())
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;

        if config.rename_prefix.is_empty() {
            anyhow::bail!("`rename_prefix` must not be empty");
        }

        Ok(config)
    }
}

impl DialectName {
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectName::Sqlite => &Sqlite,
            DialectName::Postgresql => &Postgresql,
            DialectName::SqlServer => &SqlServer,
        }
    }
}

impl InsertDefaultsSetting {
    pub fn policy(self) -> InsertDefaults {
        match self {
            InsertDefaultsSetting::Always => InsertDefaults::Always,
            InsertDefaultsSetting::Never => InsertDefaults::Never,
            InsertDefaultsSetting::WhenNonDefault => InsertDefaults::WhenNonDefault,
        }
    }
}
