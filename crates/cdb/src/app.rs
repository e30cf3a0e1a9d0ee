//! App builder - wires the stores and the authorization gateway into an app

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::prelude::*;
use cdb_store_adapter_sqlite::StoreAdapterSqlite;
use cdb_types::auth_adapter::AuthorizationGateway;
use cdb_types::store_adapter::{ConfigKeyStore, ConfigValueStore, EnvironmentStore, ServiceStore};

pub use cdb_core::app::{Adapters, App, AppOpts, AppState, VERSION};

#[derive(Debug)]
pub struct AppBuilder {
	opts: AppOpts,
	db_dir: PathBuf,
	adapters: Adapters,
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AppBuilder {
	/// Installs the tracing subscriber (filtered by `RUST_LOG`) unless one is
	/// already set
	pub fn new() -> Self {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();

		let config = Config::default();
		AppBuilder {
			opts: AppOpts { dynamic_config_keys: config.dynamic_config_keys },
			db_dir: config.db_dir,
			adapters: Adapters::default(),
		}
	}

	// Opts
	pub fn config(&mut self, config: &Config) -> &mut Self {
		self.opts.dynamic_config_keys = config.dynamic_config_keys;
		self.db_dir.clone_from(&config.db_dir);
		self
	}

	pub fn db_dir(&mut self, db_dir: impl Into<PathBuf>) -> &mut Self {
		self.db_dir = db_dir.into();
		self
	}

	pub fn dynamic_config_keys(&mut self, enabled: bool) -> &mut Self {
		self.opts.dynamic_config_keys = enabled;
		self
	}

	// Adapters
	pub fn service_store(&mut self, store: Arc<dyn ServiceStore>) -> &mut Self {
		self.adapters.service_store = Some(store);
		self
	}

	pub fn env_store(&mut self, store: Arc<dyn EnvironmentStore>) -> &mut Self {
		self.adapters.env_store = Some(store);
		self
	}

	pub fn key_store(&mut self, store: Arc<dyn ConfigKeyStore>) -> &mut Self {
		self.adapters.key_store = Some(store);
		self
	}

	pub fn value_store(&mut self, store: Arc<dyn ConfigValueStore>) -> &mut Self {
		self.adapters.value_store = Some(store);
		self
	}

	/// Uses one adapter for all four store contracts
	pub fn store<S>(&mut self, store: Arc<S>) -> &mut Self
	where
		S: ServiceStore + EnvironmentStore + ConfigKeyStore + ConfigValueStore + 'static,
	{
		self.adapters.service_store = Some(store.clone());
		self.adapters.env_store = Some(store.clone());
		self.adapters.key_store = Some(store.clone());
		self.adapters.value_store = Some(store);
		self
	}

	/// Opens the SQLite store in the configured `db_dir` and uses it for all stores
	pub async fn sqlite_store(&mut self) -> ClResult<&mut Self> {
		let store = StoreAdapterSqlite::new(&self.db_dir).await?;
		Ok(self.store(Arc::new(store)))
	}

	pub fn auth_gateway(&mut self, gateway: Arc<dyn AuthorizationGateway>) -> &mut Self {
		self.adapters.auth_gateway = Some(gateway);
		self
	}

	/// Fails with `ConfigError` when an adapter is missing
	pub fn build(&mut self) -> ClResult<App> {
		let adapters = std::mem::take(&mut self.adapters);
		let app = adapters.into_app(self.opts.clone()).inspect_err(|err| {
			error!("FATAL: {}", err);
		})?;
		info!("cdb v{} ready (dynamic config keys: {})", VERSION, app.opts.dynamic_config_keys);
		Ok(app)
	}
}

// vim: ts=4
