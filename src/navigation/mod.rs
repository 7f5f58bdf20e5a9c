//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! NavigationEvent (trigger + location)
//!     → navigator.rs (resolve against the shared RouteTable)
//!     → matched: view.rs (mount view with params)
//!     → unmatched: fallback (not-found view or redirect), exactly once
//!     → ActiveView kept as the current outlet content
//! ```

pub mod navigator;
pub mod registry;
pub mod view;
pub mod views;

pub use navigator::{
    ActiveView, Fallback, NavigationError, NavigationEvent, NavigationOutcome, NavigationTrigger,
    Navigator,
};
pub use registry::ViewRegistry;
pub use view::{escape_html, MountContext, Mounted, View};
pub use views::{BevyView, GameView, HomeView, NotFoundView};
