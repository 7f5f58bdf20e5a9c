//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the first route matching a path
//! - Return matched route or explicit no-match
//! - Generate hrefs for named routes
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(1) name lookup via HashMap
//! - O(n) pattern scan (acceptable for typical route counts)
//! - Construction fails fast on duplicate names and shadowed patterns
//! - Explicit NoMatch rather than silent default

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::RouterConfig;
use crate::config::schema::HistoryConfig;
use crate::history::{create_history, HistoryError, HistoryStrategy};
use crate::navigation::{View, ViewRegistry};
use crate::observability::metrics;
use crate::routing::matcher::MatchOptions;
use crate::routing::params::Params;
use crate::routing::pattern::{PathPattern, PatternError};

/// Errors rejecting a route table at construction or href generation.
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("route `{name}`: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: PatternError,
    },

    #[error("route name `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("route `{later}` (`{later_path}`) is unreachable behind `{earlier}` (`{earlier_path}`)")]
    CollidingPatterns {
        earlier: String,
        earlier_path: String,
        later: String,
        later_path: String,
    },

    #[error("route `{route}` references unknown view `{view}`")]
    UnknownView { route: String, view: String },

    #[error("unknown route `{0}`")]
    UnknownRoute(String),

    #[error(transparent)]
    MissingParam(PatternError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// One navigable route.
#[derive(Debug)]
pub struct RouteEntry {
    name: String,
    pattern: PathPattern,
    component: Arc<dyn View>,
}

impl RouteEntry {
    pub fn new(
        name: impl Into<String>,
        path: &str,
        component: Arc<dyn View>,
    ) -> Result<Self, RouteTableError> {
        let name = name.into();
        let pattern = PathPattern::parse(path).map_err(|source| RouteTableError::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            pattern,
            component,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn component(&self) -> &Arc<dyn View> {
        &self.component
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub entry: Arc<RouteEntry>,
    pub params: Params,
    /// Decoded query pairs, in order of appearance.
    pub query: Vec<(String, String)>,
    /// The matched path without query.
    pub path: String,
}

impl ResolvedRoute {
    pub fn name(&self) -> &str {
        self.entry.name()
    }
}

impl PartialEq for ResolvedRoute {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
            && self.params == other.params
            && self.query == other.query
            && self.path == other.path
    }
}

/// Serializable description of a route, for APIs and CLIs.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub path: String,
    pub view: String,
    pub params: Vec<String>,
}

/// Ordered, immutable route table.
#[derive(Debug)]
pub struct RouteTable {
    history: Box<dyn HistoryStrategy>,
    options: MatchOptions,
    entries: Vec<Arc<RouteEntry>>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Build a table with default matching options.
    pub fn new(history: &HistoryConfig, entries: Vec<RouteEntry>) -> Result<Self, RouteTableError> {
        Self::with_options(history, MatchOptions::default(), entries)
    }

    pub fn with_options(
        history: &HistoryConfig,
        options: MatchOptions,
        entries: Vec<RouteEntry>,
    ) -> Result<Self, RouteTableError> {
        let history = create_history(history)?;

        let mut by_name = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if by_name.insert(entry.name.clone(), index).is_some() {
                return Err(RouteTableError::DuplicateName(entry.name.clone()));
            }
            if let Some(earlier) = entries[..index]
                .iter()
                .find(|earlier| entry.pattern.is_shadowed_by(&earlier.pattern, options))
            {
                return Err(RouteTableError::CollidingPatterns {
                    earlier: earlier.name.clone(),
                    earlier_path: earlier.path().to_string(),
                    later: entry.name.clone(),
                    later_path: entry.path().to_string(),
                });
            }
        }

        tracing::debug!(
            routes = entries.len(),
            mode = %history.mode(),
            base = %history.base(),
            "Route table built"
        );

        Ok(Self {
            history,
            options,
            entries: entries.into_iter().map(Arc::new).collect(),
            by_name,
        })
    }

    /// Build the table described by a configuration, binding views by id.
    pub fn from_config(config: &RouterConfig, views: &ViewRegistry) -> Result<Self, RouteTableError> {
        let entries = config
            .routes
            .iter()
            .map(|route| {
                let view = views.get(&route.view).ok_or_else(|| RouteTableError::UnknownView {
                    route: route.name.clone(),
                    view: route.view.clone(),
                })?;
                RouteEntry::new(route.name.as_str(), &route.path, view)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_options(&config.history, MatchOptions::from(&config.matching), entries)
    }

    /// Find the first route matching `path`.
    ///
    /// `path` is a navigable path such as `/bevy/resize?debug=1`; a query is
    /// split off and decoded, anything after `#` is ignored.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let path = path.split('#').next().unwrap_or_default();
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let resolved = self.entries.iter().find_map(|entry| {
            entry
                .pattern
                .match_path(&path, self.options)
                .map(|params| (entry, params))
        });

        match resolved {
            Some((entry, params)) => {
                tracing::debug!(route = %entry.name, path = %path, "Route matched");
                metrics::record_resolution(Some(&entry.name));
                Some(ResolvedRoute {
                    entry: Arc::clone(entry),
                    params,
                    query: query
                        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
                        .unwrap_or_default(),
                    path,
                })
            }
            None => {
                tracing::debug!(path = %path, "No route matched");
                metrics::record_resolution(None);
                None
            }
        }
    }

    /// Resolve a full location (URL, path or fragment) through the history strategy.
    pub fn resolve_location(&self, location: &str) -> Option<ResolvedRoute> {
        match self.history.location_to_path(location) {
            Ok(path) => self.resolve(&path),
            Err(e) => {
                tracing::debug!(location = %location, error = %e, "Location not navigable");
                metrics::record_resolution(None);
                None
            }
        }
    }

    /// Navigable path for a named route.
    pub fn path_for(&self, name: &str, params: &Params) -> Result<String, RouteTableError> {
        let entry = self
            .get(name)
            .ok_or_else(|| RouteTableError::UnknownRoute(name.to_string()))?;
        entry.pattern.fill(params).map_err(RouteTableError::MissingParam)
    }

    /// Href for a named route, including the history base.
    pub fn href(&self, name: &str, params: &Params) -> Result<String, RouteTableError> {
        let path = self.path_for(name, params)?;
        Ok(self.history.create_href(&path))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RouteEntry>> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    pub fn entries(&self) -> &[Arc<RouteEntry>] {
        &self.entries
    }

    /// Entries whose component is the view `view_id`, in declaration order.
    pub fn bound_to<'a>(&'a self, view_id: &'a str) -> impl Iterator<Item = &'a Arc<RouteEntry>> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.component().id() == view_id)
    }

    pub fn history(&self) -> &dyn HistoryStrategy {
        self.history.as_ref()
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.entries
            .iter()
            .map(|entry| RouteSummary {
                name: entry.name.clone(),
                path: entry.path().to_string(),
                view: entry.component.id().to_string(),
                params: entry.pattern.captures().map(str::to_string).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryMode;
    use crate::navigation::{BevyView, GameView, HomeView};

    fn declared_routes() -> Vec<RouteEntry> {
        vec![
            RouteEntry::new("home", "/", Arc::new(HomeView::default())).unwrap(),
            RouteEntry::new("game", "/experiment/:experiment", Arc::new(GameView)).unwrap(),
            RouteEntry::new("bevy", "/bevy/:experiment", Arc::new(BevyView)).unwrap(),
        ]
    }

    fn table() -> RouteTable {
        RouteTable::new(&HistoryConfig::default(), declared_routes()).unwrap()
    }

    #[test]
    fn test_every_declared_route_resolves_its_own_path() {
        let table = table();
        for (name, path) in [("game", "/experiment/foo"), ("bevy", "/bevy/foo")] {
            let resolved = table.resolve(path).unwrap();
            assert_eq!(resolved.name(), name);
            assert_eq!(resolved.params.get("experiment"), Some("foo"));
        }
    }

    #[test]
    fn test_root_resolves_home_without_params() {
        let resolved = table().resolve("/").unwrap();
        assert_eq!(resolved.name(), "home");
        assert!(resolved.params.is_empty());
    }

    #[test]
    fn test_bevy_and_game_are_not_confused() {
        let table = table();

        let bevy = table.resolve("/bevy/abc").unwrap();
        assert_eq!(bevy.name(), "bevy");
        assert_eq!(bevy.params.get("experiment"), Some("abc"));

        let game = table.resolve("/experiment/abc").unwrap();
        assert_eq!(game.name(), "game");
        assert_eq!(game.params.get("experiment"), Some("abc"));
    }

    #[test]
    fn test_unmatched_path() {
        let table = table();
        assert!(table.resolve("/does-not-exist").is_none());
        assert!(table.resolve("/bevy").is_none());
        assert!(table.resolve("/bevy/a/b").is_none());
    }

    #[test]
    fn test_bound_to_finds_routes_by_view() {
        let table = table();
        let names: Vec<&str> = table.bound_to("bevy").map(|e| e.name()).collect();
        assert_eq!(names, vec!["bevy"]);
        assert_eq!(table.bound_to("not_found").count(), 0);
    }

    #[test]
    fn test_doubled_slash_is_not_root() {
        let table = table();
        assert!(table.resolve("//").is_none());
        assert!(table.resolve("/bevy//").is_none());
        assert_eq!(table.resolve("/").unwrap().name(), "home");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut routes = declared_routes();
        routes.push(RouteEntry::new("home", "/about", Arc::new(HomeView::default())).unwrap());

        let err = RouteTable::new(&HistoryConfig::default(), routes).unwrap_err();
        assert!(matches!(err, RouteTableError::DuplicateName(name) if name == "home"));
    }

    #[test]
    fn test_colliding_pattern_rejected() {
        let mut routes = declared_routes();
        routes.push(RouteEntry::new("bevy2", "/bevy/:name", Arc::new(BevyView)).unwrap());

        let err = RouteTable::new(&HistoryConfig::default(), routes).unwrap_err();
        assert!(matches!(
            err,
            RouteTableError::CollidingPatterns { ref earlier, ref later, .. }
                if earlier == "bevy" && later == "bevy2"
        ));
    }

    #[test]
    fn test_literal_before_capture_is_allowed() {
        let mut routes = vec![RouteEntry::new("latest", "/bevy/latest", Arc::new(BevyView)).unwrap()];
        routes.extend(declared_routes());
        let table = RouteTable::new(&HistoryConfig::default(), routes).unwrap();

        assert_eq!(table.resolve("/bevy/latest").unwrap().name(), "latest");
        assert_eq!(table.resolve("/bevy/resize").unwrap().name(), "bevy");
    }

    #[test]
    fn test_repeated_resolution_is_identical() {
        let table = table();
        let first = table.resolve("/bevy/abc?debug=1").unwrap();
        let second = table.resolve("/bevy/abc?debug=1").unwrap();
        assert_eq!(first, second);
        assert!(table.resolve("/nope").is_none());
        assert!(table.resolve("/nope").is_none());
    }

    #[test]
    fn test_query_is_split_off() {
        let resolved = table().resolve("/experiment/foo?level=2&mode=hard").unwrap();
        assert_eq!(resolved.path, "/experiment/foo");
        assert_eq!(
            resolved.query,
            vec![
                ("level".to_string(), "2".to_string()),
                ("mode".to_string(), "hard".to_string())
            ]
        );
    }

    #[test]
    fn test_case_and_trailing_slash_options() {
        let table = table();
        assert_eq!(table.resolve("/BEVY/abc").unwrap().name(), "bevy");
        assert_eq!(table.resolve("/bevy/abc/").unwrap().name(), "bevy");

        let strict = RouteTable::with_options(
            &HistoryConfig::default(),
            MatchOptions { sensitive: true, strict: true },
            declared_routes(),
        )
        .unwrap();
        assert!(strict.resolve("/BEVY/abc").is_none());
        assert!(strict.resolve("/bevy/abc/").is_none());
    }

    #[test]
    fn test_resolve_location_with_base() {
        let history = HistoryConfig {
            mode: HistoryMode::Hash,
            base: "/experiments/".into(),
        };
        let table = RouteTable::new(&history, declared_routes()).unwrap();

        let resolved = table
            .resolve_location("https://example.com/experiments/#/bevy/resize")
            .unwrap();
        assert_eq!(resolved.name(), "bevy");
        assert_eq!(table.resolve_location("/experiments/").unwrap().name(), "home");
    }

    #[test]
    fn test_href_round_trip() {
        let history = HistoryConfig {
            mode: HistoryMode::Hash,
            base: "/experiments/".into(),
        };
        let table = RouteTable::new(&history, declared_routes()).unwrap();
        let params = Params::new().with("experiment", "elastic box");

        let href = table.href("game", &params).unwrap();
        assert_eq!(href, "/experiments/#/experiment/elastic%20box");

        let resolved = table.resolve_location(&href).unwrap();
        assert_eq!(resolved.name(), "game");
        assert_eq!(resolved.params, params);
    }

    #[test]
    fn test_href_errors() {
        let table = table();
        assert!(matches!(
            table.href("settings", &Params::new()),
            Err(RouteTableError::UnknownRoute(_))
        ));
        assert!(matches!(
            table.href("bevy", &Params::new()),
            Err(RouteTableError::MissingParam(_))
        ));
    }
}
