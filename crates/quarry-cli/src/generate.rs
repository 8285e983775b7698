use crate::{Config, DialectName, SchemaFile};
use anyhow::{anyhow, Result};
use clap::Parser;
use console::style;
use quarry_codegen::Generator;
use quarry_core::schema::DefaultNaming;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "// Generated by quarry. Do not edit.";

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Path to the config file
    #[arg(short, long, default_value = "quarry.toml")]
    config: PathBuf,

    /// Schema snapshot to read, overriding the config
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Dialect to target, overriding the config
    #[arg(short, long, value_enum)]
    dialect: Option<DialectName>,

    /// File to write, overriding the config. `-` writes to standard output.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl GenerateCommand {
    pub(crate) fn run(self, config: Option<&Config>) -> Result<()> {
        let mut config = match config {
            Some(config) => config.clone(),
            None => Config::load(&self.config)?,
        };

        if let Some(schema) = self.schema {
            config.schema = Some(schema);
        }
        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
        }
        if let Some(out) = self.out {
            config.output = (out.as_os_str() != "-").then_some(out);
        }

        let schema_path = config
            .schema
            .as_deref()
            .ok_or_else(|| anyhow!("no schema file; pass --schema or set `schema` in the config"))?;
        let schema = SchemaFile::load(schema_path)?.into_schema()?;
        let dialect = config.dialect.dialect();

        let queries = config
            .queries
            .iter()
            .map(|query| query.method(&schema, dialect))
            .collect::<quarry_core::Result<Vec<_>>>()?;

        let naming = DefaultNaming;
        let generator = Generator::new(&schema, dialect, config.compile_options(), &naming);
        let tokens = generator.generate(&queries)?;
        let source = format!("{HEADER}\n\n{tokens}\n");

        tracing::debug!(
            tables = schema.tables.len(),
            queries = queries.len(),
            dialect = dialect.name(),
            "generated source"
        );

        let Some(output) = &config.output else {
            print!("{source}");
            return Ok(());
        };

        println!();
        println!("  {}", style("Generate Code").cyan().bold().underlined());
        println!();

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, source)?;

        println!(
            "  {} {}",
            style("✓").green().bold(),
            style(format!(
                "{} tables, {} queries ({})",
                schema.tables.len(),
                queries.len(),
                dialect.name()
            ))
            .dim()
        );

        println!();
        println!(
            "  {}",
            style(format!("Wrote {}", output.display())).green().bold()
        );
        println!();

        Ok(())
    }
}
