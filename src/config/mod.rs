//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + BASE_URL
//!     → loader.rs (parse, apply base override)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → RouteTable::from_config binds views
//!
//! On file change (server.watch = true):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new RouteTable built and swapped in
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes build a whole new table
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_with_base, load_or_default, ConfigError};
pub use schema::{
    FallbackConfig, FallbackKind, HistoryConfig, MatchingConfig, ObservabilityConfig, RouteConfig,
    RouterConfig, ServerConfig,
};
pub use validation::{validate_config, ValidationError};
