//! Legal Citations - server and query CLI
//!
//! Serves citation relation queries over HTTP, or runs a single query from
//! the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use legal_citations::logging::LogFormat;
use legal_citations::relations::{RelationFilter, RelationKind};
use legal_citations::{AppState, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "citations")]
#[command(about = "Citation relation queries over Neo4j and Meilisearch")]
struct Cli {
    /// Path to a YAML config file (default: ./config.yaml)
    #[arg(long, global = true, env = "CITATIONS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print one page of a relation as JSON
    Query {
        /// cited-by, citing, cases or references
        relation: RelationKind,
        /// Citation number of the article
        number: String,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value = "0")]
        skip: u64,
        /// Page size (default from config)
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// Print the unfiltered size of a relation
    Count {
        relation: RelationKind,
        number: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    let log_format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());
    legal_citations::logging::init(log_format)?;

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            legal_citations::start_server(config).await
        }
        Commands::Query {
            relation,
            number,
            search,
            skip,
            limit,
        } => {
            let limit = limit.unwrap_or(config.relations.default_limit);
            if limit > config.relations.max_limit {
                anyhow::bail!("limit cannot exceed {}", config.relations.max_limit);
            }
            let mut filter = RelationFilter::new(number, skip, limit);
            filter.search = search;

            let state = AppState::new(config).await?;
            let page = state.relation_service().query(relation, &filter).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
            Ok(())
        }
        Commands::Count { relation, number } => {
            let state = AppState::new(config).await?;
            let count = state.relation_service().count(relation, &number).await?;
            println!("{}", count);
            Ok(())
        }
    }
}
