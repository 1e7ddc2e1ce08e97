//! gossr demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌─────────────────────────────────────────────────────┐
//!                    │                      startup                        │
//!   config.toml ────▶│  config ──▶ container ──▶ route registry (validate) │
//!                    │                      └──▶ style registry            │
//!                    └───────────────────────────┬─────────────────────────┘
//!                                                │ AppContext
//!                                                ▼
//!   Request ────▶ request id ──▶ trace ──▶ axum router ──▶ access interceptor ──▶ endpoint
//!                                               │                                  │
//!                                               └──▶ /assets/{hash}/style.css      └──▶ resolve_url / FormTarget
//! ```

mod site;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::middleware;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use gossr::config::{load_config, AppConfig};
use gossr::lifecycle::shutdown::shutdown_signal;
use gossr::lifecycle::StartupError;
use gossr::observability::{logging, metrics};
use gossr::{bootstrap, AppContext, AppServer};

#[derive(Parser)]
#[command(name = "gossr")]
#[command(about = "Typed routes and generated stylesheet demo server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Serve the demo site (default)
    Serve,
    /// Print the validated route table as JSON
    Routes,
    /// Print the compiled stylesheet
    Css,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (config, context) = prepare(&cli)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes => {
            let table: Vec<_> = context
                .routes
                .bindings()
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "route": b.route(),
                        "handler": b.handler(),
                        "methods": b.methods().iter().map(|m| m.as_str()).collect::<Vec<_>>(),
                        "pattern": b.pattern(),
                        "query_fields": b.metadata().query_fields,
                        "required_fields": b.metadata().required_query_fields,
                        "guarded": b.access().is_some(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Commands::Css => {
            let sheet = context.styles.stylesheet();
            eprintln!("hash: {}", sheet.hash);
            print!("{}", sheet.text);
        }
        Commands::Serve => serve(config, context).await?,
    }

    Ok(())
}

/// Load configuration, start logging and build the registries.
fn prepare(cli: &Cli) -> Result<(AppConfig, AppContext), StartupError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("gossr v{} starting", env!("CARGO_PKG_VERSION"));

    let context = bootstrap(&config, &site::container())?;
    Ok((config, context))
}

async fn serve(config: AppConfig, context: AppContext) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        stylesheet = %context.styles.stylesheet_url(),
        "Listening for connections"
    );

    let server = AppServer::new(config, &context)
        .map_router(|router| router.layer(middleware::from_fn(site::demo_session)));
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
