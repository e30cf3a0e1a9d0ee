//! Config key registry behind the gate

use cdb_types::store_adapter::{ConfigKey, CreateConfigKey};

use crate::perm::{READ_CONFIG_KEYS, require_any};
use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct ConfigKeyService {
	app: App,
}

impl ConfigKeyService {
	pub fn new(app: App) -> Self {
		Self { app }
	}

	pub async fn create_config_key(&self, actor: &Actor, key: &CreateConfigKey) -> ClResult<ConfigKey> {
		require_any(&self.app, actor, &[Permission::ManageConfigKeys], &key.name).await?;
		let created = self.app.key_store.create_config_key(key).await?;
		info!("{} created by user {}", created, actor.user_id);
		Ok(created)
	}

	pub async fn get_config_key(&self, actor: &Actor, id: KeyId) -> ClResult<ConfigKey> {
		require_any(&self.app, actor, READ_CONFIG_KEYS, "config keys").await?;
		self.app.key_store.read_config_key(id).await
	}

	pub async fn get_config_key_by_name(
		&self,
		actor: &Actor,
		service_id: ServiceId,
		name: &str,
	) -> ClResult<ConfigKey> {
		require_any(&self.app, actor, READ_CONFIG_KEYS, "config keys").await?;
		self.app.key_store.read_config_key_by_name(service_id, name).await
	}

	/// All keys, or only those in `service_ids` when it is not empty
	pub async fn list_config_keys(
		&self,
		actor: &Actor,
		service_ids: &[ServiceId],
	) -> ClResult<Vec<ConfigKey>> {
		require_any(&self.app, actor, READ_CONFIG_KEYS, "config keys").await?;
		self.app.key_store.list_config_keys(service_ids).await
	}
}

// vim: ts=4
