//! Resolution engine and authorization gate for cdb.
//!
//! The engine merges an environment's own config values with those inherited
//! along its promotion chain. The gate services wrap every public operation
//! with a capability check before delegating to the engine or a store.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod config_key;
pub mod config_value;
pub mod environment;
pub mod perm;
pub mod prelude;
pub mod resolve;
pub mod service;
pub mod tree;

pub use app::{Adapters, App, AppOpts, AppState};
pub use config_key::ConfigKeyService;
pub use config_value::{ConfigValueService, NewConfigValue, SetConfigValue};
pub use environment::EnvironmentService;
pub use service::ServiceService;

// vim: ts=4
