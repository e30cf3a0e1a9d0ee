//! Shared setup for the engine and gate integration tests
//!
//! Every fixture runs on its own SQLite database in a TempDir, with a
//! programmable authorization gateway. The TempDir lives in the fixture so
//! cleanup happens when the test ends.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use cdb_core::{Adapters, App, AppOpts};
use cdb_store_adapter_sqlite::StoreAdapterSqlite;
use cdb_types::auth_adapter::{Actor, AuthorizationGateway, Permission};
use cdb_types::prelude::*;
use cdb_types::store_adapter::*;
use cdb_types::value::{ConfigScalar, ValueType};

pub const ALL_PERMISSIONS: &[Permission] = &[
	Permission::ConfigureEnvironments,
	Permission::ConfigureSensitiveEnvironments,
	Permission::ManageEnvironments,
	Permission::ManageConfigKeys,
	Permission::ManageRoles,
	Permission::ManageUsers,
];

/// Gateway answering from an in-memory grant table
#[derive(Debug, Default)]
pub struct TestGateway {
	grants: Mutex<HashMap<i64, HashSet<Permission>>>,
	failure: Mutex<Option<String>>,
}

impl TestGateway {
	pub fn grant(&self, actor: &Actor, permissions: &[Permission]) {
		let mut grants = self.grants.lock().expect("grants lock");
		grants.entry(actor.user_id).or_default().extend(permissions.iter().copied());
	}

	/// Makes every following check fail with a gateway error
	pub fn fail_with(&self, msg: &str) {
		*self.failure.lock().expect("failure lock") = Some(msg.to_string());
	}
}

#[async_trait]
impl AuthorizationGateway for TestGateway {
	async fn has_permission(&self, actor: &Actor, permissions: &[Permission]) -> ClResult<bool> {
		if let Some(msg) = self.failure.lock().expect("failure lock").clone() {
			return Err(Error::Gateway(msg));
		}
		let grants = self.grants.lock().expect("grants lock");
		Ok(grants
			.get(&actor.user_id)
			.is_some_and(|held| permissions.iter().any(|p| held.contains(p))))
	}
}

pub struct Fixture {
	pub app: App,
	pub store: Arc<StoreAdapterSqlite>,
	pub gateway: Arc<TestGateway>,
	pub service: Service,
	pub production: Environment,
	pub staging: Environment,
	pub dev: Environment,
	/// Holds every permission
	pub admin: Actor,
	_temp: TempDir,
}

pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

/// production <- staging <- dev in a single service
pub async fn setup(dynamic_config_keys: bool) -> Fixture {
	setup_test_logging();

	let temp = TempDir::new().expect("Failed to create temp directory");
	let store = Arc::new(StoreAdapterSqlite::new(temp.path()).await.expect("Failed to create adapter"));
	let gateway = Arc::new(TestGateway::default());

	let app = Adapters {
		service_store: Some(store.clone()),
		env_store: Some(store.clone()),
		key_store: Some(store.clone()),
		value_store: Some(store.clone()),
		auth_gateway: Some(gateway.clone()),
	}
	.into_app(AppOpts { dynamic_config_keys })
	.expect("Failed to build app");

	let service = store.create_service("billing").await.expect("Should create service");
	let production = create_env(&store, &service, "production", None).await;
	let staging = create_env(&store, &service, "staging", Some(&production)).await;
	let dev = create_env(&store, &service, "dev", Some(&staging)).await;

	let admin = Actor::new(1, "admin@example.com");
	gateway.grant(&admin, ALL_PERMISSIONS);

	Fixture { app, store, gateway, service, production, staging, dev, admin, _temp: temp }
}

pub async fn create_env(
	store: &StoreAdapterSqlite,
	service: &Service,
	name: &str,
	parent: Option<&Environment>,
) -> Environment {
	store
		.create_environment(&CreateEnvironment {
			name: name.into(),
			service_id: service.id,
			promotes_to_id: parent.map(|env| env.id),
			sensitive: false,
		})
		.await
		.expect("Should create environment")
}

impl Fixture {
	/// An actor holding exactly `permissions`
	pub fn actor(&self, user_id: i64, permissions: &[Permission]) -> Actor {
		let actor = Actor::new(user_id, format!("user{}@example.com", user_id));
		self.gateway.grant(&actor, permissions);
		actor
	}

	pub async fn key(&self, name: &str, value_type: ValueType, can_propagate: bool) -> ConfigKey {
		let mut key = CreateConfigKey::new(self.service.id, name, value_type);
		key.can_propagate = Some(can_propagate);
		self.store.create_config_key(&key).await.expect("Should create key")
	}

	pub async fn value(&self, env: &Environment, key: &ConfigKey, value: ConfigScalar) -> ConfigValue {
		self.store
			.create_config_value(&CreateConfigValue {
				environment_id: env.id,
				config_key_id: key.id,
				value,
			})
			.await
			.expect("Should create value")
	}

	pub async fn sensitive_env(&self, name: &str, parent: Option<&Environment>) -> Environment {
		self.store
			.create_environment(&CreateEnvironment {
				name: name.into(),
				service_id: self.service.id,
				promotes_to_id: parent.map(|env| env.id),
				sensitive: true,
			})
			.await
			.expect("Should create environment")
	}
}

// vim: ts=4
