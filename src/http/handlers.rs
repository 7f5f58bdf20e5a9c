//! Dev server handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::request::request_id_of;
use crate::http::server::AppState;
use crate::navigation::{
    escape_html, ActiveView, NavigationEvent, NavigationOutcome, NavigationTrigger, Navigator,
};
use crate::observability::metrics;
use crate::routing::{Params, RouteSummary, RouteTableError};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub matched: bool,
    pub location: String,
    /// Fallback kind when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<&'static str>,
    pub active: ActiveView,
}

#[derive(Debug, Serialize)]
pub struct HrefResponse {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    let site = state.site.load();
    metrics::record_request("routes", 200);
    Json(site.table.summaries())
}

/// Resolve a location the way the front-end would, including the fallback.
pub async fn resolve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ResolveQuery>,
) -> Response {
    let site = state.site.load_full();
    let request_id = request_id_of(&headers);

    let mut navigator = match Navigator::new(site.table.clone(), site.fallback.clone()) {
        Ok(navigator) => navigator,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Navigator unavailable");
            metrics::record_request("resolve", 500);
            return error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let fallback_kind = site.fallback.kind();
    let outcome = navigator.navigate(NavigationEvent::new(
        NavigationTrigger::DirectEntry,
        query.location.as_str(),
    ));

    let (status, body) = match outcome {
        NavigationOutcome::Mounted(active) => (
            StatusCode::OK,
            ResolveResponse {
                matched: true,
                location: query.location,
                fallback: None,
                active,
            },
        ),
        NavigationOutcome::Fallback { location, active } => {
            tracing::info!(request_id = %request_id, location = %location, "Resolve fell back");
            (
                StatusCode::NOT_FOUND,
                ResolveResponse {
                    matched: false,
                    location,
                    fallback: Some(fallback_kind),
                    active,
                },
            )
        }
    };

    metrics::record_request("resolve", status.as_u16());
    (status, Json(body)).into_response()
}

/// Build the href of a named route from query parameters.
pub async fn href(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let site = state.site.load();
    let params: Params = params.into_iter().collect();

    match site.table.href(&name, &params) {
        Ok(href) => {
            metrics::record_request("href", 200);
            Json(HrefResponse { name, href }).into_response()
        }
        Err(e @ RouteTableError::UnknownRoute(_)) => {
            metrics::record_request("href", 404);
            error(StatusCode::NOT_FOUND, e.to_string())
        }
        Err(e) => {
            metrics::record_request("href", 400);
            error(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// HTML shell served at the history base.
pub async fn shell(State(state): State<AppState>) -> Html<String> {
    let site = state.site.load();
    let table = &site.table;

    let mut links = String::new();
    for entry in table.entries() {
        let captures: Vec<&str> = entry.pattern().captures().collect();
        if captures.is_empty() {
            if let Ok(href) = table.href(entry.name(), &Params::new()) {
                links.push_str(&link(&href, entry.name()));
            }
            continue;
        }
        for experiment in &site.experiments {
            let params: Params = captures.iter().map(|c| (*c, experiment.as_str())).collect();
            if let Ok(href) = table.href(entry.name(), &params) {
                links.push_str(&link(&href, &format!("{}: {}", entry.name(), experiment)));
            }
        }
    }

    metrics::record_request("shell", 200);
    Html(format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<nav><ul>{links}</ul></nav>\n<div id=\"app\"></div>\n<canvas id=\"bevy\"></canvas>\n</body>\n</html>\n",
        title = escape_html(&site.title),
    ))
}

fn link(href: &str, label: &str) -> String {
    format!(
        "<li><a href=\"{}\">{}</a></li>",
        escape_html(href),
        escape_html(label)
    )
}

fn error(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
