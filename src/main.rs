//! Routing rule administration CLI.
//!
//! Opens the configured SQLite database and runs one repository operation,
//! printing the result as JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use routing_admin::config::loader::load_config;
use routing_admin::config::validation::validate_config;
use routing_admin::config::AppConfig;
use routing_admin::observability::logging::init_logging;
use routing_admin::routing::{RawInput, RepositoryError, RoutingRepository};
use routing_admin::storage;

#[derive(Parser)]
#[command(name = "routing-admin")]
#[command(about = "Manage routing rules and their channel groups", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration file
    #[arg(short, long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the routing and channels tables if missing
    Init,
    /// List every routing rule
    List,
    /// Show one routing rule
    Get { id: i64 },
    /// Create a routing rule
    Create {
        #[arg(long)]
        rexp: String,
        #[arg(long)]
        target: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a routing rule (only the description is mutable)
    Change {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        rexp: Option<String>,
        #[arg(long)]
        target: Option<String>,
    },
    /// Delete a routing rule and the channels of its target group
    Delete { id: i64 },
    /// Count the channels in a group
    Total { gid: i64 },
    /// Check whether a routing rule exists
    Exists { id: i64 },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Load configuration, open the database and execute one command.
async fn run(cli: Cli) -> Result<Value, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(url) = cli.database {
        config.database.url = url;
    }
    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            eprintln!("Error: {}", e);
        }
        std::process::exit(2);
    }

    init_logging(&config.observability)?;
    tracing::debug!(database = %config.database.url, "Configuration loaded");

    let pool = storage::connect(&config.database).await?;
    let repo = RoutingRepository::new(pool.clone());

    let output = execute(&repo, cli.command).await;
    pool.close().await;
    output
}

async fn execute(
    repo: &RoutingRepository,
    command: Commands,
) -> Result<Value, Box<dyn std::error::Error>> {
    let output = match command {
        Commands::Init => {
            storage::init_schema(repo.pool()).await?;
            json!({ "initialized": true })
        }
        Commands::List => serde_json::to_value(repo.get_all().await?)?,
        Commands::Get { id } => match repo.get(id).await? {
            Some(rule) => serde_json::to_value(rule)?,
            None => return Err(RepositoryError::NotFound(id).into()),
        },
        Commands::Create { rexp, target, description } => {
            let mut data = RawInput::new();
            data.insert("rexp".into(), Value::String(rexp));
            data.insert("target".into(), Value::String(target));
            if let Some(description) = description {
                data.insert("description".into(), Value::String(description));
            }
            let id = repo.create(&data).await?;
            json!({ "id": id })
        }
        Commands::Change { id, description, rexp, target } => {
            let mut data = RawInput::new();
            for (key, value) in [("description", description), ("rexp", rexp), ("target", target)] {
                if let Some(value) = value {
                    data.insert(key.into(), Value::String(value));
                }
            }
            repo.change(id, &data).await?;
            json!({ "id": id, "changed": true })
        }
        Commands::Delete { id } => {
            let channels = repo.delete(id).await?;
            json!({ "id": id, "deleted": true, "channels_removed": channels })
        }
        Commands::Total { gid } => json!({ "gid": gid, "total": repo.total(gid).await? }),
        Commands::Exists { id } => json!({ "id": id, "exists": repo.is_exist(id).await? }),
    };

    Ok(output)
}
