//! memory-cli: command-line client for the local memory service.

use clap::{Parser, Subcommand};
use memory_cli::import;
use memory_client::{MemoryClient, DEFAULT_BASE_URL};
use memory_types::{EntityInput, MemoryApi, ObservationInput};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "memory-cli", version, about = "Client for the local memory service API")]
struct Cli {
    /// Base address of the memory service.
    #[arg(long, env = "MEMORY_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Attach an observation to an entity.
    Observe {
        entity_name: String,
        content: String,
        /// Source tag recorded with the observation.
        #[arg(long)]
        source: Option<String>,
    },
    /// Create an entity.
    Entity {
        name: String,
        #[arg(long = "type")]
        entity_type: String,
        /// Extra key=value fields, passed through to the service unmodified.
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },
    /// Fetch the relationship graph for an entity.
    Graph { entity_name: String },
    /// Search entities.
    Search { query: String },
    /// Replay a Claude/ChatGPT conversation export into the memory service.
    Import { file: std::path::PathBuf },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let client = MemoryClient::with_base_url(&cli.base_url)?;

    match cli.command {
        Command::Observe {
            entity_name,
            content,
            source,
        } => {
            let mut input = ObservationInput::new(entity_name, content);
            input.source = source;
            print_json(&client.add_observation(&input).await?)?;
        }
        Command::Entity {
            name,
            entity_type,
            fields,
        } => {
            let mut input = EntityInput::new(name, entity_type);
            for (key, value) in fields {
                input = input.with_field(key, serde_json::Value::String(value));
            }
            print_json(&client.create_entity(&input).await?)?;
        }
        Command::Graph { entity_name } => {
            print_json(&client.get_graph(&entity_name).await?)?;
        }
        Command::Search { query } => {
            print_json(&client.search_entities(&query).await?)?;
        }
        Command::Import { file } => {
            let raw = tokio::fs::read_to_string(&file).await?;
            let doc: serde_json::Value = serde_json::from_str(&raw)?;
            let parsed = import::parse_export(&doc)?;
            let report = import::run_import(&client, &parsed.conversations).await?;
            tracing::info!(
                conversations = report.conversations,
                observations = report.observations,
                skipped = parsed.skipped,
                "import finished"
            );
            println!(
                "imported {} conversations ({} observations), skipped {}",
                report.conversations, report.observations, parsed.skipped
            );
        }
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
