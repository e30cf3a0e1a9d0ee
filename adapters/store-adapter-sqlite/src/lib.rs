//! SQLite-backed store adapter for cdb.
//!
//! Implements the service, environment, config key and config value store
//! contracts on a single SQLite database. Each domain lives in its own
//! module; this file only opens the pool and delegates.

#![forbid(unsafe_code)]

mod config_key;
mod config_value;
mod environment;
mod schema;
mod service;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use cdb_types::prelude::*;
use cdb_types::store_adapter::{
	ConfigKey, ConfigKeyStore, ConfigValue, ConfigValueStore, CreateConfigKey, CreateConfigValue,
	CreateEnvironment, Environment, EnvironmentStore, ListConfigValueOptions, Service,
	ServiceStore,
};

const DB_FILE: &str = "cdb.db";

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Opens (creating if needed) the database inside the `path` directory
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(path.as_ref()).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref().join(DB_FILE))
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| warn!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		info!("store adapter opened at {}", path.as_ref().display());
		Ok(Self { db })
	}
}

#[async_trait]
impl ServiceStore for StoreAdapterSqlite {
	async fn create_service(&self, name: &str) -> ClResult<Service> {
		service::create(&self.db, name).await
	}

	async fn read_service(&self, id: ServiceId) -> ClResult<Service> {
		service::read(&self.db, id).await
	}

	async fn read_service_by_name(&self, name: &str) -> ClResult<Service> {
		service::read_by_name(&self.db, name).await
	}

	async fn list_services(&self) -> ClResult<Vec<Service>> {
		service::list(&self.db).await
	}
}

#[async_trait]
impl EnvironmentStore for StoreAdapterSqlite {
	async fn create_environment(&self, env: &CreateEnvironment) -> ClResult<Environment> {
		environment::create(&self.db, env).await
	}

	async fn read_environment(&self, id: EnvId) -> ClResult<Environment> {
		environment::read(&self.db, id).await
	}

	async fn read_environment_by_name(
		&self,
		service_id: ServiceId,
		name: &str,
	) -> ClResult<Environment> {
		environment::read_by_name(&self.db, service_id, name).await
	}

	async fn list_environments(&self, include_sensitive: bool) -> ClResult<Vec<Environment>> {
		environment::list(&self.db, include_sensitive).await
	}

	async fn update_environment(&self, env: &Environment) -> ClResult<Environment> {
		environment::update(&self.db, env).await
	}

	async fn delete_environment(&self, id: EnvId) -> ClResult<()> {
		environment::delete(&self.db, id).await
	}
}

#[async_trait]
impl ConfigKeyStore for StoreAdapterSqlite {
	async fn create_config_key(&self, key: &CreateConfigKey) -> ClResult<ConfigKey> {
		config_key::create(&self.db, key).await
	}

	async fn read_config_key(&self, id: KeyId) -> ClResult<ConfigKey> {
		config_key::read(&self.db, id).await
	}

	async fn read_config_key_by_name(
		&self,
		service_id: ServiceId,
		name: &str,
	) -> ClResult<ConfigKey> {
		config_key::read_by_name(&self.db, service_id, name).await
	}

	async fn list_config_keys(&self, service_ids: &[ServiceId]) -> ClResult<Vec<ConfigKey>> {
		config_key::list(&self.db, service_ids).await
	}
}

#[async_trait]
impl ConfigValueStore for StoreAdapterSqlite {
	async fn create_config_value(&self, value: &CreateConfigValue) -> ClResult<ConfigValue> {
		config_value::create(&self.db, value).await
	}

	async fn update_config_value(&self, value: &ConfigValue) -> ClResult<ConfigValue> {
		config_value::update(&self.db, value).await
	}

	async fn read_config_value(&self, id: ValueId) -> ClResult<ConfigValue> {
		config_value::read(&self.db, id).await
	}

	async fn read_config_value_by_env_and_key(
		&self,
		env_id: EnvId,
		key_name: &str,
	) -> ClResult<ConfigValue> {
		config_value::read_by_env_and_key(&self.db, env_id, key_name).await
	}

	async fn list_config_values(
		&self,
		env_id: EnvId,
		opts: &ListConfigValueOptions,
	) -> ClResult<Vec<ConfigValue>> {
		config_value::list(&self.db, env_id, opts).await
	}
}

// vim: ts=4
