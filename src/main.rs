//! experiment-router
//!
//! Route table and dev server for the experiments front-end.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml + BASE_URL
//!          │
//!          ▼
//!   ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//!   │   config    │────▶│   routing    │────▶│ navigation  │
//!   │ load/valid. │     │  RouteTable  │     │  Navigator  │
//!   └─────────────┘     └──────┬───────┘     └──────┬──────┘
//!                              │                    │
//!                       ┌──────▼───────┐     ┌──────▼──────┐
//!                       │   history    │     │    views    │
//!                       │ hash / path  │     │ (external)  │
//!                       └──────────────┘     └─────────────┘
//!
//!   Cross-cutting: observability (tracing, metrics), lifecycle (shutdown),
//!   http (dev server: shell page + JSON API)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use experiment_router::config::{load_or_default, watcher::ConfigWatcher, RouterConfig};
use experiment_router::lifecycle::{signals, Shutdown};
use experiment_router::navigation::{NavigationEvent, NavigationTrigger, Navigator, ViewRegistry};
use experiment_router::observability::{logging, metrics};
use experiment_router::routing::{Params, RouteTable};
use experiment_router::DevServer;

#[derive(Parser)]
#[command(name = "experiment-router")]
#[command(about = "Route table and dev server for the experiments front-end", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the app shell and the routing API
    Serve {
        /// Override `server.bind_address`
        #[arg(short, long)]
        bind: Option<String>,
        /// Reload routes when the config file changes
        #[arg(short, long)]
        watch: bool,
    },
    /// Resolve a location (URL, path or `#/fragment`)
    Resolve { location: String },
    /// List the route table
    Routes,
    /// Build the href of a named route
    Href {
        name: String,
        /// Parameter as `name=value`, repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Validate the configuration and exit
    Check,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    let views = ViewRegistry::builtin(config.experiments.clone());

    match cli.command {
        Commands::Serve { bind, watch } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            config.server.watch |= watch;
            serve(config, views, cli.config).await?;
        }
        Commands::Resolve { location } => {
            let table = Arc::new(RouteTable::from_config(&config, &views)?);
            let mut navigator = Navigator::from_config(table, &config.fallback, &views)?;
            let outcome = navigator.navigate(NavigationEvent::new(NavigationTrigger::DirectEntry, location));
            println!("{}", serde_json::to_string_pretty(outcome.active())?);
            if outcome.is_fallback() {
                eprintln!("no route matched; fallback applied");
            }
        }
        Commands::Routes => {
            let table = RouteTable::from_config(&config, &views)?;
            println!("{}", serde_json::to_string_pretty(&table.summaries())?);
        }
        Commands::Href { name, params } => {
            let table = RouteTable::from_config(&config, &views)?;
            let params: Params = params.into_iter().collect();
            println!("{}", table.href(&name, &params)?);
        }
        Commands::Check => {
            let table = RouteTable::from_config(&config, &views)?;
            Navigator::from_config(Arc::new(table), &config.fallback, &views)?;
            println!("configuration ok: {} routes", config.routes.len());
        }
    }

    Ok(())
}

async fn serve(
    config: RouterConfig,
    views: ViewRegistry,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.server.bind_address,
        mode = %config.history.mode,
        base = %config.history.base,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&config_path, config.server.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.clone());
            (Some(watcher.run()?), updates)
        }
        (None, true) => {
            tracing::warn!("--watch needs --config; hot reload disabled");
            (None, mpsc::unbounded_channel().1)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = DevServer::new(&config, views)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
