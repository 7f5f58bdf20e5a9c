//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigable path (e.g. /bevy/resize?debug=1)
//!     → router.rs (ordered scan of route entries)
//!     → pattern.rs (split path, evaluate segment matchers)
//!     → matcher.rs (literal / named capture per segment)
//!     → Return: ResolvedRoute (entry + params + query) or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Parse patterns into segment matchers
//!     → Reject duplicate names and shadowed patterns
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod params;
pub mod pattern;
pub mod router;

pub use matcher::MatchOptions;
pub use params::Params;
pub use pattern::{PathPattern, PatternError};
pub use router::{ResolvedRoute, RouteEntry, RouteSummary, RouteTable, RouteTableError};
