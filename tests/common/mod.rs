//! Shared utilities for integration tests.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use experiment_router::config::RouterConfig;
use experiment_router::navigation::{Navigator, ViewRegistry};
use experiment_router::routing::RouteTable;
use experiment_router::{DevServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A running dev server and the handles to drive it.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<RouterConfig>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a dev server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(config: RouterConfig) -> TestServer {
    let views = ViewRegistry::builtin(config.experiments.clone());
    let server = DevServer::new(&config, views).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        shutdown,
        config_updates,
    }
}

/// Table and navigator for a configuration, with the built-in views.
#[allow(dead_code)]
pub fn navigator_for(config: &RouterConfig) -> Navigator {
    let views = ViewRegistry::builtin(config.experiments.clone());
    let table = Arc::new(RouteTable::from_config(config, &views).unwrap());
    Navigator::from_config(table, &config.fallback, &views).unwrap()
}

/// Write `contents` to a temporary TOML file.
#[allow(dead_code)]
pub fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Client that never reuses connections between tests.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
