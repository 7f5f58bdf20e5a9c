//! Navigation: turns navigation events into mounted views.
//!
//! # Responsibilities
//! - Resolve each event's location against the shared route table
//! - Mount the matched view with its params
//! - Invoke the configured fallback exactly once for unmatched locations
//! - Track the currently mounted view
//!
//! # Design Decisions
//! - The table is injected (Arc), never looked up globally
//! - Resolution is synchronous; a navigation completes within one call
//! - A redirect fallback that cannot be resolved degrades to the not-found view

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{FallbackConfig, FallbackKind};
use crate::navigation::registry::ViewRegistry;
use crate::navigation::view::{MountContext, Mounted, View};
use crate::observability::metrics;
use crate::routing::{Params, RouteTable, RouteTableError};

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("fallback view `{0}` is not registered")]
    UnknownFallbackView(String),

    #[error("redirect fallback requires a target route")]
    MissingRedirectTarget,

    #[error("redirect target `{0}` must be an existing route without parameters")]
    InvalidRedirectTarget(String),

    #[error(transparent)]
    Route(#[from] RouteTableError),
}

/// What started a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTrigger {
    /// The user activated a link.
    Link,
    /// The user typed or pasted a URL.
    DirectEntry,
    /// Code asked to navigate (`Navigator::push`).
    Programmatic,
    /// Browser back/forward.
    HistoryPop,
}

impl NavigationTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationTrigger::Link => "link",
            NavigationTrigger::DirectEntry => "direct_entry",
            NavigationTrigger::Programmatic => "programmatic",
            NavigationTrigger::HistoryPop => "history_pop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub trigger: NavigationTrigger,
    /// Full URL, path or fragment as reported by the trigger.
    pub location: String,
}

impl NavigationEvent {
    pub fn new(trigger: NavigationTrigger, location: impl Into<String>) -> Self {
        Self {
            trigger,
            location: location.into(),
        }
    }
}

/// The view currently mounted in the outlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveView {
    /// Route that produced the view; `None` for the not-found view.
    pub route: Option<String>,
    pub path: String,
    pub params: Params,
    pub mounted: Mounted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The location matched a route.
    Mounted(ActiveView),
    /// No route matched; the fallback produced `active`.
    Fallback { location: String, active: ActiveView },
}

impl NavigationOutcome {
    pub fn active(&self) -> &ActiveView {
        match self {
            NavigationOutcome::Mounted(active) => active,
            NavigationOutcome::Fallback { active, .. } => active,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, NavigationOutcome::Fallback { .. })
    }
}

/// Behaviour for locations no route matches.
#[derive(Debug, Clone)]
pub enum Fallback {
    /// Mount a dedicated error view.
    NotFound { view: Arc<dyn View> },
    /// Mount a parameterless route instead; `not_found` is used if it cannot resolve.
    Redirect {
        route: String,
        not_found: Arc<dyn View>,
    },
}

impl Fallback {
    pub fn from_config(config: &FallbackConfig, views: &ViewRegistry) -> Result<Self, NavigationError> {
        let view = views
            .get(&config.view)
            .ok_or_else(|| NavigationError::UnknownFallbackView(config.view.clone()))?;

        Ok(match config.kind {
            FallbackKind::NotFound => Fallback::NotFound { view },
            FallbackKind::Redirect => Fallback::Redirect {
                route: config.route.clone().ok_or(NavigationError::MissingRedirectTarget)?,
                not_found: view,
            },
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Fallback::NotFound { .. } => "not_found",
            Fallback::Redirect { .. } => "redirect",
        }
    }
}

/// Consumes navigation events and mounts views.
#[derive(Debug)]
pub struct Navigator {
    table: Arc<RouteTable>,
    fallback: Fallback,
    current: Option<ActiveView>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, fallback: Fallback) -> Result<Self, NavigationError> {
        if let Fallback::Redirect { route, .. } = &fallback {
            let valid = table
                .get(route)
                .is_some_and(|entry| entry.pattern().captures().next().is_none());
            if !valid {
                return Err(NavigationError::InvalidRedirectTarget(route.clone()));
            }
        }

        Ok(Self {
            table,
            fallback,
            current: None,
        })
    }

    pub fn from_config(
        table: Arc<RouteTable>,
        config: &FallbackConfig,
        views: &ViewRegistry,
    ) -> Result<Self, NavigationError> {
        Self::new(table, Fallback::from_config(config, views)?)
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn current(&self) -> Option<&ActiveView> {
        self.current.as_ref()
    }

    /// Handle one navigation event.
    pub fn navigate(&mut self, event: NavigationEvent) -> NavigationOutcome {
        let outcome = match self.table.resolve_location(&event.location) {
            Some(resolved) => NavigationOutcome::Mounted(self.mount(
                Some(resolved.name()),
                &resolved.path,
                resolved.params.clone(),
                resolved.entry.component(),
            )),
            None => {
                tracing::info!(
                    location = %event.location,
                    trigger = event.trigger.as_str(),
                    fallback = self.fallback.kind(),
                    "No route matched, using fallback"
                );
                metrics::record_fallback(self.fallback.kind());
                let active = self.fall_back(&event.location);
                NavigationOutcome::Fallback {
                    location: event.location.clone(),
                    active,
                }
            }
        };

        tracing::debug!(
            location = %event.location,
            trigger = event.trigger.as_str(),
            view = %outcome.active().mounted.view,
            "Navigation complete"
        );
        metrics::record_navigation(
            event.trigger.as_str(),
            if outcome.is_fallback() { "fallback" } else { "mounted" },
        );

        self.current = Some(outcome.active().clone());
        outcome
    }

    /// Navigate to a named route.
    pub fn push(&mut self, name: &str, params: &Params) -> Result<NavigationOutcome, NavigationError> {
        let href = self.table.href(name, params)?;
        Ok(self.navigate(NavigationEvent::new(NavigationTrigger::Programmatic, href)))
    }

    fn mount(&self, route: Option<&str>, path: &str, params: Params, view: &Arc<dyn View>) -> ActiveView {
        let mounted = view.mount(&MountContext {
            route,
            path,
            params: &params,
            table: &self.table,
        });
        ActiveView {
            route: route.map(str::to_string),
            path: path.to_string(),
            params,
            mounted,
        }
    }

    fn fall_back(&self, location: &str) -> ActiveView {
        let path = self
            .table
            .history()
            .location_to_path(location)
            .unwrap_or_else(|_| location.to_string());

        match &self.fallback {
            Fallback::NotFound { view } => self.mount(None, &path, Params::new(), view),
            Fallback::Redirect { route, not_found } => {
                let target = self
                    .table
                    .path_for(route, &Params::new())
                    .ok()
                    .and_then(|target| self.table.resolve(&target));
                match target {
                    Some(resolved) => self.mount(
                        Some(resolved.name()),
                        &resolved.path,
                        resolved.params.clone(),
                        resolved.entry.component(),
                    ),
                    None => {
                        tracing::warn!(route = %route, "Redirect target did not resolve");
                        self.mount(None, &path, Params::new(), not_found)
                    }
                }
            }
        }
    }
}
