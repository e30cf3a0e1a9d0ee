//! App state type

use std::sync::Arc;

use crate::prelude::*;
use crate::{ConfigKeyService, ConfigValueService, EnvironmentService, ServiceService};

use cdb_types::auth_adapter::AuthorizationGateway;
use cdb_types::store_adapter::{ConfigKeyStore, ConfigValueStore, EnvironmentStore, ServiceStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct AppOpts {
	/// Create a config key on first use when setting a value for an unknown name
	pub dynamic_config_keys: bool,
}

impl Default for AppOpts {
	fn default() -> Self {
		Self { dynamic_config_keys: true }
	}
}

#[derive(Debug)]
pub struct AppState {
	pub opts: AppOpts,

	pub service_store: Arc<dyn ServiceStore>,
	pub env_store: Arc<dyn EnvironmentStore>,
	pub key_store: Arc<dyn ConfigKeyStore>,
	pub value_store: Arc<dyn ConfigValueStore>,
	pub auth_gateway: Arc<dyn AuthorizationGateway>,
}

pub type App = Arc<AppState>;

impl AppState {
	pub fn services(self: &Arc<Self>) -> ServiceService {
		ServiceService::new(Arc::clone(self))
	}

	pub fn environments(self: &Arc<Self>) -> EnvironmentService {
		EnvironmentService::new(Arc::clone(self))
	}

	pub fn config_keys(self: &Arc<Self>) -> ConfigKeyService {
		ConfigKeyService::new(Arc::clone(self))
	}

	pub fn config_values(self: &Arc<Self>) -> ConfigValueService {
		ConfigValueService::new(Arc::clone(self))
	}
}

/// Adapters collected by a builder before the app is assembled
#[derive(Debug, Default)]
pub struct Adapters {
	pub service_store: Option<Arc<dyn ServiceStore>>,
	pub env_store: Option<Arc<dyn EnvironmentStore>>,
	pub key_store: Option<Arc<dyn ConfigKeyStore>>,
	pub value_store: Option<Arc<dyn ConfigValueStore>>,
	pub auth_gateway: Option<Arc<dyn AuthorizationGateway>>,
}

impl Adapters {
	/// Assembles the app, failing with `ConfigError` for the first missing adapter
	pub fn into_app(self, opts: AppOpts) -> ClResult<App> {
		fn required<T: ?Sized>(adapter: Option<Arc<T>>, name: &str) -> ClResult<Arc<T>> {
			adapter.ok_or_else(|| Error::ConfigError(format!("no {} configured", name)))
		}

		Ok(Arc::new(AppState {
			opts,
			service_store: required(self.service_store, "service store")?,
			env_store: required(self.env_store, "environment store")?,
			key_store: required(self.key_store, "config key store")?,
			value_store: required(self.value_store, "config value store")?,
			auth_gateway: required(self.auth_gateway, "authorization gateway")?,
		}))
	}
}

// vim: ts=4
