//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (fallback references an existing route)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate names and colliding routes
//! - Keep the history base clear of the dev server's API paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Views are checked for presence here; whether an id is known to the
//!   `ViewRegistry` is checked by `RouteTable::from_config`, which holds it

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{FallbackKind, RouterConfig};
use crate::history::normalize_base;
use crate::http::base_overlaps_api;
use crate::routing::{MatchOptions, PathPattern, PatternError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no routes declared")]
    NoRoutes,

    #[error("route #{0} has an empty name")]
    EmptyName(usize),

    #[error("route name `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("route `{name}`: {source}")]
    InvalidPattern { name: String, source: PatternError },

    #[error("route `{later}` is unreachable behind `{earlier}`")]
    CollidingPatterns { earlier: String, later: String },

    #[error("route `{0}` has no view")]
    MissingView(String),

    #[error("invalid history base `{0}`")]
    InvalidBase(String),

    #[error("history base `{0}` overlaps the dev server API")]
    ReservedBase(String),

    #[error("redirect fallback requires `fallback.route`")]
    MissingRedirectTarget,

    #[error("redirect target `{0}` is not a declared route without parameters")]
    InvalidRedirectTarget(String),

    #[error("`server.request_timeout_secs` must be greater than zero")]
    ZeroTimeout,

    #[error("invalid address `{value}` for `{field}`")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let options = MatchOptions::from(&config.matching);

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut names = HashSet::new();
    let mut compiled: Vec<(&str, PathPattern)> = Vec::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(index));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }

        if route.view.trim().is_empty() {
            errors.push(ValidationError::MissingView(route.name.clone()));
        }

        match PathPattern::parse(&route.path) {
            Ok(pattern) => {
                if let Some((earlier, _)) = compiled
                    .iter()
                    .find(|(_, earlier)| pattern.is_shadowed_by(earlier, options))
                {
                    errors.push(ValidationError::CollidingPatterns {
                        earlier: earlier.to_string(),
                        later: route.name.clone(),
                    });
                }
                compiled.push((route.name.as_str(), pattern));
            }
            Err(source) => errors.push(ValidationError::InvalidPattern {
                name: route.name.clone(),
                source,
            }),
        }
    }

    match normalize_base(&config.history.base) {
        Ok(base) if base_overlaps_api(&base) => {
            errors.push(ValidationError::ReservedBase(config.history.base.clone()))
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidBase(config.history.base.clone())),
    }

    if config.fallback.kind == FallbackKind::Redirect {
        match &config.fallback.route {
            None => errors.push(ValidationError::MissingRedirectTarget),
            Some(target) => {
                let valid = compiled
                    .iter()
                    .any(|(name, pattern)| name == target && pattern.captures().next().is_none());
                if !valid {
                    errors.push(ValidationError::InvalidRedirectTarget(target.clone()));
                }
            }
        }
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
