//! Nursery Command Line Interface
//!
//! Usage:
//!   nursery serve            - Start the catalog API server
//!   nursery init             - Create tables and indexes
//!   nursery seed-categories  - Insert the default category list
//!   nursery status           - Query a running server's health

use clap::{Parser, Subcommand};
use nursery_api::{run_server, ApiConfig};
use nursery_db::StoreConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nursery")]
#[command(about = "Plant nursery catalog service")]
#[command(version)]
struct Cli {
    /// Store endpoint (`memory://`, `mem://`, `rocksdb://path`, `ws://host:port`)
    #[arg(long, env = "NURSERY_DB_URL", global = true)]
    db_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the catalog API server
    #[command(alias = "start")]
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, env = "NURSERY_HOST")]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long, env = "NURSERY_PORT")]
        port: Option<u16>,
        /// Accept any plant category tag
        #[arg(long)]
        free_categories: bool,
        /// Start with an empty category list instead of the defaults
        #[arg(long)]
        no_seed_categories: bool,
    },

    /// Initialize the database schema
    Init,

    /// Insert the default categories, skipping names that exist
    SeedCategories {
        /// Actor id recorded as the creator
        #[arg(long, default_value = "system")]
        actor: String,
    },

    /// Show server status
    Status {
        /// API server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        api_url: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run_command(cli).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn store_config(db_url: Option<String>) -> StoreConfig {
    let config = StoreConfig::from_env();
    match db_url {
        Some(url) => config.with_endpoint(url),
        None => config,
    }
}

async fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store_config = store_config(cli.db_url);

    match cli.command {
        Commands::Serve {
            host,
            port,
            free_categories,
            no_seed_categories,
        } => {
            let mut config = ApiConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if free_categories {
                config.catalog.require_known_categories = false;
            }
            if no_seed_categories {
                config.catalog.seed_default_categories = false;
            }

            let store = nursery_db::open_store(&store_config).await?;
            run_server(config, store).await
        }

        Commands::Init => commands::init_schema(&store_config).await,

        Commands::SeedCategories { actor } => {
            commands::seed_categories(&store_config, &actor).await
        }

        Commands::Status { api_url } => commands::status(&api_url).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_db_url_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["nursery", "serve", "--db-url", "memory://"]).unwrap();
        assert_eq!(cli.db_url.as_deref(), Some("memory://"));
        assert!(matches!(cli.command, Commands::Serve { .. }));

        let cli = Cli::try_parse_from(["nursery", "--db-url", "mem://", "init"]).unwrap();
        assert_eq!(cli.db_url.as_deref(), Some("mem://"));
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "nursery",
            "start",
            "--port",
            "8080",
            "--free-categories",
            "--no-seed-categories",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve {
                port,
                free_categories,
                no_seed_categories,
                ..
            } => {
                assert_eq!(port, Some(8080));
                assert!(free_categories);
                assert!(no_seed_categories);
            }
            _ => panic!("expected serve"),
        }
    }
}
