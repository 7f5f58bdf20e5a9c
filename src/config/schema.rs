//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults: an empty file yields the declared routes in
//! hash mode under `/`.

use serde::{Deserialize, Serialize};

use crate::history::HistoryMode;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// History strategy selector.
    pub history: HistoryConfig,

    /// Literal comparison and trailing slash handling.
    pub matching: MatchingConfig,

    /// Behaviour for unmatched locations.
    pub fallback: FallbackConfig,

    /// Experiment names linked from the home view.
    pub experiments: Vec<String>,

    /// Route definitions, in match order.
    pub routes: Vec<RouteConfig>,

    /// Dev server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            matching: MatchingConfig::default(),
            fallback: FallbackConfig::default(),
            experiments: vec!["elastic-box".to_string(), "resize".to_string()],
            routes: default_routes(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// The three routes of the experiments front-end.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("home", "/", "home"),
        RouteConfig::new("game", "/experiment/:experiment", "game"),
        RouteConfig::new("bevy", "/bevy/:experiment", "bevy"),
    ]
}

/// History strategy selector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Where the navigable path lives in the URL.
    pub mode: HistoryMode,

    /// Deploy base path. Overridden by `BASE_URL` at load time.
    pub base: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            mode: HistoryMode::Hash,
            base: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Case-sensitive literal segments.
    pub sensitive: bool,

    /// Distinguish trailing slashes.
    pub strict: bool,
}

/// Route configuration binding a pattern to a view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,

    /// Path pattern, `:name` segments capture.
    pub path: String,

    /// View id from the view registry.
    pub view: String,
}

impl RouteConfig {
    pub fn new(name: impl Into<String>, path: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            view: view.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// Mount the not-found view.
    #[default]
    NotFound,
    /// Mount `route` instead.
    Redirect,
}

/// Fallback for locations no route matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub kind: FallbackKind,

    /// Redirect target (parameterless route name).
    pub route: Option<String>,

    /// View mounted for unmatched locations.
    pub view: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            kind: FallbackKind::NotFound,
            route: None,
            view: "not_found".to_string(),
        }
    }
}

/// Dev server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Title of the served shell page.
    pub title: String,

    /// Reload routes when the config file changes.
    pub watch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 10,
            title: "Experiments".to_string(),
            watch: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json: bool,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_declared_routes() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.history.mode, HistoryMode::Hash);
        assert_eq!(config.history.base, "/");

        let routes: Vec<(&str, &str)> = config
            .routes
            .iter()
            .map(|r| (r.name.as_str(), r.path.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("home", "/"),
                ("game", "/experiment/:experiment"),
                ("bevy", "/bevy/:experiment"),
            ]
        );
    }

    #[test]
    fn test_parse_full_file() {
        let config: RouterConfig = toml::from_str(
            r#"
            experiments = ["resize"]

            [history]
            mode = "path"
            base = "/lab/"

            [fallback]
            kind = "redirect"
            route = "home"

            [[routes]]
            name = "home"
            path = "/"
            view = "home"
            "#,
        )
        .unwrap();

        assert_eq!(config.history.mode, HistoryMode::Path);
        assert_eq!(config.fallback.kind, FallbackKind::Redirect);
        assert_eq!(config.fallback.route.as_deref(), Some("home"));
        assert_eq!(config.fallback.view, "not_found");
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.experiments, vec!["resize"]);
    }
}
