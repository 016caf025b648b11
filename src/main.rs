mod config;
mod database;
mod entities;
mod error;
mod http_server;
mod logging;
mod ports;
mod relations;
mod serializers;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::init_tracing,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "CINEMA_API_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `cinema_api=debug,tower_http=info`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// OTLP gRPC endpoint to export traces to
    #[arg(long, env = "OTLP_ENDPOINT", global = true)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// The host to bind to (overrides the config file)
        #[arg(long, env = "CINEMA_API_HOST")]
        host: Option<String>,

        /// The port to run the server on (overrides the config file)
        #[arg(short, long, env = "CINEMA_API_PORT")]
        port: Option<u16>,
    },
    /// Apply pending database migrations and exit
    Migrate,
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(
        "cinema-api",
        args.otlp_endpoint.as_deref(),
        &args.log_level,
    )?;

    let result = run(args).await;

    if let Some(tracer_provider) = tracer_provider
        && let Err(e) = tracer_provider.shutdown()
    {
        log::warn!("Failed to flush traces: {e}");
    }

    result
}

async fn run(args: Args) -> Result<()> {
    log::debug!("Cinema API starting");

    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load cinema-api config")?;

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                log::info!("Default config available at: {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Migrate => {
            // Opening the database applies migrations
            Database::open(&config.database_path()).await?;
            log::info!("Migrations applied");
        }
        Commands::Serve { host, port } => {
            let database = Database::open(&config.database_path()).await?;
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            log::info!("Starting HTTP server on {}:{}", host, port);
            http_server::app::start(HttpServerConfig {
                host,
                port,
                database,
            })
            .await?;
        }
    }

    Ok(())
}
