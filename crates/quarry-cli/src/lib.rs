mod config;
mod generate;
mod query_file;
mod schema_file;

pub use config::*;
pub use generate::GenerateCommand;
pub use query_file::{FilterEntry, JoinEntry, OrderByEntry, QueryEntry};
pub use schema_file::{ColumnEntry, ForeignKeyEntry, SchemaFile, TableEntry};

use anyhow::Result;
use clap::Parser;

/// Quarry CLI library for building custom command-line tools
#[derive(Debug, Default)]
pub struct QuarryCli {
    config: Option<Config>,
}

impl QuarryCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` instead of loading `quarry.toml`.
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Parse and execute CLI commands from command-line arguments
    pub fn parse_and_run(&self) -> Result<()> {
        let cli = Cli::parse();
        init_tracing(cli.verbose);
        self.run(cli)
    }

    /// Parse and execute CLI commands from an iterator of arguments
    pub fn parse_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        self.run(cli)
    }

    fn run(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Command::Generate(cmd) => cmd.run(self.config.as_ref()),
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("quarry={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(about = "Quarry - data-access code generator")]
#[command(version)]
struct Cli {
    /// Log compiled statements and generated types
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Generate record types and data-access methods from a schema snapshot
    Generate(GenerateCommand),
}
