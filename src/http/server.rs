//! Dev server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Serve the HTML shell at the history base
//! - Expose route listing, resolution and href generation as JSON
//! - Wire up middleware (tracing, timeout, request ID)
//! - Swap in a new route table when the configuration reloads
//!
//! # Design Decisions
//! - The current table lives in an ArcSwap; handlers load it once per request
//! - A reload that fails to build keeps the current table
//! - The shell path is fixed at startup; a changed base needs a restart
//! - A base overlapping the fixed API paths is an error, not a panic

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{body::Body, http::Request, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::navigation::{Fallback, NavigationError, Navigator, ViewRegistry};
use crate::routing::RouteTable;

/// Path prefixes served by the API whatever the history base is.
pub const API_PATHS: [&str; 2] = ["/health", "/api"];

/// True when a shell mounted at `base` would overlap an API path.
pub fn base_overlaps_api(base: &str) -> bool {
    let bare = base.trim_end_matches('/');
    API_PATHS.iter().any(|reserved| {
        bare.strip_prefix(*reserved)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("history base `{0}` overlaps the dev server API")]
    ReservedBase(String),

    #[error(transparent)]
    Site(#[from] NavigationError),
}

/// Everything a request needs, rebuilt as a whole on reload.
#[derive(Debug)]
pub struct Site {
    pub table: Arc<RouteTable>,
    pub fallback: Fallback,
    pub title: String,
    pub experiments: Vec<String>,
}

impl Site {
    pub fn build(config: &RouterConfig, views: &ViewRegistry) -> Result<Self, NavigationError> {
        let table = Arc::new(RouteTable::from_config(config, views)?);
        let fallback = Fallback::from_config(&config.fallback, views)?;
        // Rejects redirect targets the table cannot serve.
        Navigator::new(table.clone(), fallback.clone())?;

        Ok(Self {
            table,
            fallback,
            title: config.server.title.clone(),
            experiments: config.experiments.clone(),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<ArcSwap<Site>>,
    pub views: Arc<ViewRegistry>,
}

impl AppState {
    /// Build a new site from `config` and swap it in.
    pub fn reload(&self, config: &RouterConfig) -> Result<(), NavigationError> {
        let site = Site::build(config, &self.views)?;
        let current_base = self.site.load().table.history().base().to_string();
        if site.table.history().base() != current_base {
            tracing::warn!(
                current = %current_base,
                configured = %site.table.history().base(),
                "History base changed; the shell stays at the current base until restart"
            );
        }

        tracing::info!(routes = site.table.entries().len(), "Route table reloaded");
        self.site.store(Arc::new(site));
        Ok(())
    }
}

/// HTTP dev server for the experiments front-end.
pub struct DevServer {
    router: Router,
    state: AppState,
}

impl DevServer {
    /// Create a new server with the given configuration and views.
    pub fn new(config: &RouterConfig, views: ViewRegistry) -> Result<Self, ServerError> {
        let site = Site::build(config, &views)?;
        let base = site.table.history().base().to_string();
        if base_overlaps_api(&base) {
            return Err(ServerError::ReservedBase(base));
        }

        let state = AppState {
            site: Arc::new(ArcSwap::from_pointee(site)),
            views: Arc::new(views),
        };

        let router = Self::build_router(&base, config.server.request_timeout_secs, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(base: &str, timeout_secs: u64, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/routes", get(handlers::list_routes))
            .route("/api/resolve", get(handlers::resolve))
            .route("/api/href/{name}", get(handlers::href))
            .route(base, get(handlers::shell));
        if base != "/" {
            router = router.route(base.trim_end_matches('/'), get(handlers::shell));
        }

        router
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id_of(request.headers()),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Dev server starting");

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.reload(&config) {
                    tracing::error!(error = %e, "Rejected reloaded config, keeping current routes");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        reloader.abort();
        tracing::info!("Dev server stopped");
        Ok(())
    }
}
