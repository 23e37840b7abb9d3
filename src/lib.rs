pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod locale;
pub mod models;
pub mod money;
pub mod period;
pub mod queries;
pub mod recurrence;

/// Library version from Cargo.toml (single source of truth)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
