//! HTTP dev server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and echoed)
//!     → handlers.rs (shell page, routes, resolve, href)
//!     → current Site loaded from the ArcSwap
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{base_overlaps_api, AppState, DevServer, ServerError, Site};
