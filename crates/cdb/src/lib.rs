//! cdb is a multi-tenant configuration database.
//!
//! # Features
//!
//! - Environments form promotion chains (`dev -> staging -> production`)
//! - Typed config keys, scoped to a service namespace
//! - Values resolve along the chain: nearest environment wins, and a key
//!   decides whether its ancestors' values show through
//! - Every read and mutation passes a permission check first
//! - SQLite storage out of the box, any store behind the adapter traits
//!
//! ```no_run
//! # use std::sync::Arc;
//! # async fn run(gateway: Arc<dyn cdb::auth_adapter::AuthorizationGateway>) -> cdb::error::ClResult<()> {
//! let mut builder = cdb::AppBuilder::new();
//! builder.config(&cdb::Config::from_env()).auth_gateway(gateway);
//! builder.sqlite_store().await?;
//! let app = builder.build()?;
//!
//! let _envs = app.environments();
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub use cdb_types::auth_adapter;
pub use cdb_types::error;
pub use cdb_types::store_adapter;
pub use cdb_types::types;
pub use cdb_types::value;

pub use cdb_core::{
	ConfigKeyService, ConfigValueService, EnvironmentService, NewConfigValue, ServiceService,
	SetConfigValue, resolve, tree,
};
pub use cdb_store_adapter_sqlite::StoreAdapterSqlite;

pub mod app;
pub mod config;
pub mod prelude;

pub use app::{App, AppBuilder, AppOpts, AppState};
pub use config::Config;

// vim: ts=4
