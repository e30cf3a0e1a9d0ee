//! Config values and resolution behind the gate
//!
//! Reads follow environment visibility. Writes need configure on ordinary
//! environments and configure-sensitive on sensitive ones.

use serde::Deserialize;

use cdb_types::store_adapter::{ConfigValue, CreateConfigValue};
use cdb_types::value::{ValueInput, validate};

use crate::perm::{can_configure_environment, read_visible_environment};
use crate::prelude::*;
use crate::resolve;

/// A value to create against a key id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConfigValue {
	pub environment_id: EnvId,
	pub config_key_id: KeyId,
	#[serde(flatten)]
	pub value: ValueInput,
}

/// One element of a bulk set, addressed by key name
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetConfigValue {
	pub name: Box<str>,
	/// Inherited elements are read back instead of written
	#[serde(default)]
	pub inherited: bool,
	#[serde(flatten)]
	pub value: ValueInput,
}

impl SetConfigValue {
	pub fn new(name: impl Into<Box<str>>, value: ValueInput) -> Self {
		Self { name: name.into(), inherited: false, value }
	}
}

#[derive(Debug, Clone)]
pub struct ConfigValueService {
	app: App,
}

impl ConfigValueService {
	pub fn new(app: App) -> Self {
		Self { app }
	}

	pub async fn get_configuration(&self, actor: &Actor, env_id: EnvId) -> ClResult<Vec<ConfigValue>> {
		let env = read_visible_environment(&self.app, actor, env_id).await?;
		resolve::get_configuration(&self.app, &env).await
	}

	pub async fn get_configuration_value(
		&self,
		actor: &Actor,
		env_id: EnvId,
		key: &str,
	) -> ClResult<ConfigValue> {
		let env = read_visible_environment(&self.app, actor, env_id).await?;
		resolve::get_configuration_value(&self.app, &env, key).await
	}

	pub async fn set_configuration_value(
		&self,
		actor: &Actor,
		env_id: EnvId,
		key: &str,
		value: ValueInput,
	) -> ClResult<ConfigValue> {
		let env = self.app.env_store.read_environment(env_id).await?;
		can_configure_environment(&self.app, actor, &env).await?;

		let result = resolve::set_configuration_value(&self.app, &env, key, value).await?;
		info!("{} set by user {}", result, actor.user_id);
		Ok(result)
	}

	/// Applies each element in order, stopping at the first error
	pub async fn set_configuration_values(
		&self,
		actor: &Actor,
		env_id: EnvId,
		values: Vec<SetConfigValue>,
	) -> ClResult<Vec<ConfigValue>> {
		let env = self.app.env_store.read_environment(env_id).await?;
		can_configure_environment(&self.app, actor, &env).await?;

		let mut results = Vec::with_capacity(values.len());
		for SetConfigValue { name, inherited, value } in values {
			let result = if inherited {
				resolve::get_configuration_value(&self.app, &env, &name).await?
			} else {
				resolve::set_configuration_value(&self.app, &env, &name, value).await?
			};
			results.push(result);
		}

		info!("{} values set on {} by user {}", results.len(), env, actor.user_id);
		Ok(results)
	}

	/// Strict create: fails with `Conflict` when the pair already has a value
	///
	/// The key must belong to the environment's service.
	pub async fn create_config_value(
		&self,
		actor: &Actor,
		value: NewConfigValue,
	) -> ClResult<ConfigValue> {
		let env = self.app.env_store.read_environment(value.environment_id).await?;
		can_configure_environment(&self.app, actor, &env).await?;

		let key = self.app.key_store.read_config_key(value.config_key_id).await?;
		if key.service_id != env.service_id {
			warn!("{} is outside the service of {}", key, env);
			return Err(Error::ReferenceError(Reference::ConfigKey));
		}
		let scalar = validate(Some(key.value_type), value.value.fields)?;

		let created = self
			.app
			.value_store
			.create_config_value(&CreateConfigValue {
				environment_id: env.id,
				config_key_id: key.id,
				value: scalar,
			})
			.await?;
		info!("{} created by user {}", created, actor.user_id);
		Ok(created)
	}
}


// vim: ts=4
