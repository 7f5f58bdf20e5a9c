//! Configuration file watcher for hot reload.
//!
//! # Data Flow
//! ```text
//! notify event (modify/create)
//!     → change signal on an mpsc channel
//!     → debounce task waits for the burst to settle
//!     → Reloader loads, validates and compares with the last config
//!     → RouterConfig sent to the dev server
//! ```
//!
//! # Design Decisions
//! - Editors emit several events per save; one reload runs per burst
//! - A file that loads to the config already running is not forwarded
//! - A broken edit is logged and leaves the running route table in place

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config_with_base, BASE_URL_ENV};
use crate::config::schema::RouterConfig;

/// Quiet period after the last file event before reloading.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

/// Loads the watched file and decides whether the result is worth forwarding.
#[derive(Debug)]
struct Reloader {
    path: PathBuf,
    base_override: Option<String>,
    current: RouterConfig,
}

impl Reloader {
    fn reload(&mut self) -> Option<RouterConfig> {
        match load_config_with_base(&self.path, self.base_override.clone()) {
            Ok(config) if config == self.current => {
                tracing::debug!(path = %self.path.display(), "Config unchanged, skipping reload");
                None
            }
            Ok(config) => {
                self.current = config.clone();
                Some(config)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current routes");
                None
            }
        }
    }
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    reloader: Reloader,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, starting from the config already running.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path, current: RouterConfig) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                reloader: Reloader {
                    path: path.to_path_buf(),
                    base_override: std::env::var(BASE_URL_ENV).ok(),
                    current,
                },
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned handle must be kept alive.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let path = self.reloader.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    let _ = change_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tokio::spawn(debounce(change_rx, self.reloader, self.update_tx));

        tracing::info!(path = %path.display(), debounce_ms = DEBOUNCE.as_millis() as u64, "Config watcher started");
        Ok(watcher)
    }
}

/// Collapse each burst of change signals into a single reload.
async fn debounce(
    mut changes: mpsc::UnboundedReceiver<()>,
    mut reloader: Reloader,
    updates: mpsc::UnboundedSender<RouterConfig>,
) {
    while changes.recv().await.is_some() {
        loop {
            match tokio::time::timeout(DEBOUNCE, changes.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        tracing::info!(path = %reloader.path.display(), "Config file change detected, reloading");
        if let Some(config) = reloader.reload() {
            if updates.send(config).is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn reloader_for(file: &tempfile::NamedTempFile) -> Reloader {
        Reloader {
            path: file.path().to_path_buf(),
            base_override: None,
            current: RouterConfig::default(),
        }
    }

    fn rewrite(file: &mut tempfile::NamedTempFile, contents: &str) {
        let handle = file.as_file_mut();
        handle.set_len(0).unwrap();
        std::io::Seek::rewind(handle).unwrap();
        handle.write_all(contents.as_bytes()).unwrap();
        handle.flush().unwrap();
    }

    #[test]
    fn test_unchanged_config_is_not_forwarded() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut reloader = reloader_for(&file);

        // An empty file loads to the defaults, which are already running.
        assert!(reloader.reload().is_none());
    }

    #[test]
    fn test_changed_config_is_forwarded_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        rewrite(&mut file, "experiments = [\"resize\"]");
        let mut reloader = reloader_for(&file);

        let config = reloader.reload().unwrap();
        assert_eq!(config.experiments, vec!["resize"]);
        assert!(reloader.reload().is_none());
    }

    #[test]
    fn test_invalid_config_is_not_forwarded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        rewrite(&mut file, "[server]\nrequest_timeout_secs = 0");
        let mut reloader = reloader_for(&file);

        assert!(reloader.reload().is_none());
        assert_eq!(reloader.current.server.request_timeout_secs, 10);
    }

    #[tokio::test]
    async fn test_burst_of_changes_reloads_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        rewrite(&mut file, "experiments = [\"elastic-box\"]");

        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        tokio::spawn(debounce(change_rx, reloader_for(&file), update_tx));

        for _ in 0..3 {
            change_tx.send(()).unwrap();
        }

        let config = tokio::time::timeout(DEBOUNCE * 8, update_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(config.experiments, vec!["elastic-box"]);

        // No second reload for the same burst.
        assert!(tokio::time::timeout(DEBOUNCE * 2, update_rx.recv()).await.is_err());
    }
}
