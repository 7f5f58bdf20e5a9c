//! Route table for the experiments front-end.
//!
//! Maps navigable paths (`/`, `/experiment/:experiment`, `/bevy/:experiment`)
//! to views, using hash-based history under a deploy base path.

pub mod config;
pub mod history;
pub mod http;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::DevServer;
pub use lifecycle::Shutdown;
pub use navigation::{NavigationEvent, NavigationOutcome, NavigationTrigger, Navigator, ViewRegistry};
pub use routing::{Params, ResolvedRoute, RouteEntry, RouteTable, RouteTableError};
