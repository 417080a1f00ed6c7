use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dynamite::connection::ConnectionRegistry;
use dynamite::{RawConfiguration, RegistryBuilder, StaticMappingReader};
use dynamite_core::schema::format_schema;

/// Dynamite - Wire DynamoDB item managers from a table configuration
#[derive(Parser, Debug)]
#[command(name = "dynamite")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Validate a configuration and print the schema of every manager
    Check(CheckCommand),
}

#[derive(Debug, clap::Args)]
struct CheckCommand {
    /// Path to the table configuration (JSON)
    #[arg(long, short, env = "DYNAMITE_CONFIG")]
    config: PathBuf,

    /// Path to the item mappings (JSON list)
    #[arg(long, short, env = "DYNAMITE_MAPPINGS")]
    mappings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dynamite=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Check(cmd) => check(cmd).await,
    }
}

async fn check(cmd: CheckCommand) -> Result<()> {
    let raw = RawConfiguration::from_path(&cmd.config)
        .with_context(|| format!("loading {}", cmd.config.display()))?;
    let config = raw.validate()?;

    let reader = match &cmd.mappings {
        Some(path) => StaticMappingReader::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StaticMappingReader::new(),
    };

    let connections = ConnectionRegistry::from_env(&config.connection_names()).await;
    let registry = RegistryBuilder::new(connections)
        .mapping_reader(config.mapping_reader.clone(), reader)
        .build(&raw)?;

    for (name, manager) in registry.iter() {
        for line in format_schema(name, manager.schema()) {
            println!("{}", line);
        }
        println!("  Managed items: {}", manager.managed_items().join(", "));
    }

    println!("{} item manager(s) ready", registry.len());
    Ok(())
}
