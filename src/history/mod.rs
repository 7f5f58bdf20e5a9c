//! History strategies.
//!
//! # Data Flow
//! ```text
//! location (URL, path or fragment)
//!     → split_location (url crate, relative to a dummy origin)
//!     → HistoryStrategy::location_to_path
//!     → navigable path handed to the route table
//!
//! Reverse direction:
//!     route path → HistoryStrategy::create_href → href for links
//! ```
//!
//! # Design Decisions
//! - Hash mode keeps the navigable path after `#`, so the server only ever
//!   sees the base path and needs no rewrite rules
//! - Path mode strips the base prefix from the URL path
//! - The base is normalised to start and end with `/`

pub mod hash;
pub mod web;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use hash::HashHistory;
pub use web::WebHistory;

use crate::config::schema::HistoryConfig;

/// Which part of the URL carries the navigable path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Path lives in the URL fragment (`/base/#/bevy/x`).
    #[default]
    Hash,
    /// Path is the URL path below the base (`/base/bevy/x`).
    Path,
}

impl std::fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryMode::Hash => write!(f, "hash"),
            HistoryMode::Path => write!(f, "path"),
        }
    }
}

/// Errors produced while interpreting locations.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid location `{location}`: {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("path `{path}` is outside of base `{base}`")]
    OutsideBase { path: String, base: String },

    #[error("invalid base `{0}`")]
    InvalidBase(String),
}

/// Strategy translating between locations and navigable paths.
pub trait HistoryStrategy: Send + Sync + std::fmt::Debug {
    fn mode(&self) -> HistoryMode;

    /// Normalised base, always starting and ending with `/`.
    fn base(&self) -> &str;

    /// Extract the navigable path (including any query) from a location.
    fn location_to_path(&self, location: &str) -> Result<String, HistoryError>;

    /// Build the href a link to `path` should carry.
    fn create_href(&self, path: &str) -> String;
}

/// Build the strategy selected by the configuration.
pub fn create_history(config: &HistoryConfig) -> Result<Box<dyn HistoryStrategy>, HistoryError> {
    let base = normalize_base(&config.base)?;
    Ok(match config.mode {
        HistoryMode::Hash => Box::new(HashHistory::new(base)),
        HistoryMode::Path => Box::new(WebHistory::new(base)),
    })
}

/// Normalise a deploy base path to `/segment/.../`.
///
/// Anything from a `#` on is dropped, an empty base becomes `/`. Segments
/// that read as route parameters (`:id`, `*rest`, `{id}`) are rejected.
pub fn normalize_base(base: &str) -> Result<String, HistoryError> {
    let base = base.split('#').next().unwrap_or_default().trim();
    let parameter_like = base.split('/').any(|segment| {
        segment.starts_with(':') || segment.starts_with('*') || segment.contains(&['{', '}'][..])
    });
    if base.contains('?') || base.chars().any(char::is_whitespace) || parameter_like {
        return Err(HistoryError::InvalidBase(base.to_string()));
    }

    let mut normalized = String::with_capacity(base.len() + 2);
    if !base.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(base);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

/// A location split into its path (with query) and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Location {
    pub path: String,
    pub fragment: Option<String>,
}

/// Parse absolute URLs as-is and everything else relative to a dummy origin.
pub(crate) fn split_location(location: &str) -> Result<Location, HistoryError> {
    let parsed = match Url::parse(location) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
            .and_then(|origin| origin.join(location))
            .map_err(|source| HistoryError::InvalidLocation {
                location: location.to_string(),
                source,
            })?,
        Err(source) => {
            return Err(HistoryError::InvalidLocation {
                location: location.to_string(),
                source,
            })
        }
    };

    let mut path = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }

    Ok(Location {
        path,
        fragment: parsed.fragment().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("").unwrap(), "/");
        assert_eq!(normalize_base("/").unwrap(), "/");
        assert_eq!(normalize_base("/app").unwrap(), "/app/");
        assert_eq!(normalize_base("app/").unwrap(), "/app/");
        assert_eq!(normalize_base("/app/#").unwrap(), "/app/");
        assert!(normalize_base("/app?x=1").is_err());
    }

    #[test]
    fn test_normalize_base_rejects_parameter_segments() {
        assert!(normalize_base("/:lab/").is_err());
        assert!(normalize_base("/lab/*rest").is_err());
        assert!(normalize_base("/{lab}").is_err());
        assert!(normalize_base("/lab}/").is_err());
        assert_eq!(normalize_base("/lab:1/").unwrap(), "/lab:1/");
    }

    #[test]
    fn test_split_location() {
        let absolute = split_location("https://example.com/app/#/bevy/resize").unwrap();
        assert_eq!(absolute.path, "/app/");
        assert_eq!(absolute.fragment.as_deref(), Some("/bevy/resize"));

        let fragment_only = split_location("#/experiment/foo").unwrap();
        assert_eq!(fragment_only.path, "/");
        assert_eq!(fragment_only.fragment.as_deref(), Some("/experiment/foo"));

        let with_query = split_location("/app/bevy/x?debug=1").unwrap();
        assert_eq!(with_query.path, "/app/bevy/x?debug=1");
        assert_eq!(with_query.fragment, None);
    }

    #[test]
    fn test_create_history_by_mode() {
        let hash = create_history(&HistoryConfig::default()).unwrap();
        assert_eq!(hash.mode(), HistoryMode::Hash);
        assert_eq!(hash.base(), "/");

        let path = create_history(&HistoryConfig {
            mode: HistoryMode::Path,
            base: "/app".into(),
        })
        .unwrap();
        assert_eq!(path.mode(), HistoryMode::Path);
        assert_eq!(path.base(), "/app/");
    }
}
