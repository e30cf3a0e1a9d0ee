//! Configuration resolution along the promotion chain
//!
//! A value set on an environment always wins for that environment. Values
//! set on ancestors show through only for keys the environment (or a nearer
//! ancestor) has not set, and in the merged view only when the key propagates.
//! These functions do no permission checks; the gate services call them after
//! their own.

use std::collections::HashSet;

use cdb_types::store_adapter::{
	ConfigValue, CreateConfigKey, CreateConfigValue, Environment, ListConfigValueOptions,
};
use cdb_types::value::{ValueInput, validate};

use crate::app::AppState;
use crate::prelude::*;

/// Guards an ancestor walk against a looping promotion chain
#[derive(Debug, Default)]
struct Walk(HashSet<EnvId>);

impl Walk {
	fn enter(&mut self, env_id: EnvId) -> ClResult<()> {
		if self.0.insert(env_id) {
			Ok(())
		} else {
			warn!("promotion chain loops at environment {}", env_id);
			Err(Error::CycleDetected(format!("promotion chain loops at environment {}", env_id)))
		}
	}
}

/// Merged view of `env`: its own values first, then each ancestor's
/// propagating values for keys not seen yet, nearest ancestor first
pub async fn get_configuration(app: &AppState, env: &Environment) -> ClResult<Vec<ConfigValue>> {
	let mut walk = Walk::default();
	walk.enter(env.id)?;

	let mut result =
		app.value_store.list_config_values(env.id, &ListConfigValueOptions::default()).await?;
	let mut opts = ListConfigValueOptions {
		propagating_only: true,
		exclude_keys: result.iter().map(|value| value.name.clone()).collect(),
	};

	let mut parent = env.promotes_to_id;
	while let Some(parent_id) = parent {
		walk.enter(parent_id)?;
		let ancestor = app.env_store.read_environment(parent_id).await?;
		let layer = app.value_store.list_config_values(ancestor.id, &opts).await?;

		opts.exclude_keys.extend(layer.iter().map(|value| value.name.clone()));
		result.extend(layer.into_iter().map(|value| value.inherit_from(&ancestor.name)));
		parent = ancestor.promotes_to_id;
	}

	debug!("resolved {} values for {}", result.len(), env);
	Ok(result)
}

/// Single value lookup: the value set on `env`, or else the nearest ancestor's
///
/// Unlike `get_configuration` this does not consult the key's propagation
/// flag. `inherited_from` names the ancestor that holds the value.
pub async fn get_configuration_value(
	app: &AppState,
	env: &Environment,
	key_name: &str,
) -> ClResult<ConfigValue> {
	let mut walk = Walk::default();
	walk.enter(env.id)?;

	match app.value_store.read_config_value_by_env_and_key(env.id, key_name).await {
		Err(Error::NotFound) => (),
		res => return res,
	}

	let mut parent = env.promotes_to_id;
	while let Some(parent_id) = parent {
		walk.enter(parent_id)?;
		let ancestor = app.env_store.read_environment(parent_id).await?;
		match app.value_store.read_config_value_by_env_and_key(ancestor.id, key_name).await {
			Ok(value) => return Ok(value.inherit_from(&ancestor.name)),
			Err(Error::NotFound) => (),
			Err(err) => return Err(err),
		}
		parent = ancestor.promotes_to_id;
	}

	Err(Error::NotFound)
}

/// Creates or updates the value of `key_name` on `env`
///
/// An unknown key is created on the fly when dynamic keys are enabled, typed
/// by the input's declared type. Once the key exists its type replaces the
/// declared one before validation.
pub async fn set_configuration_value(
	app: &AppState,
	env: &Environment,
	key_name: &str,
	input: ValueInput,
) -> ClResult<ConfigValue> {
	let key = match app.key_store.read_config_key_by_name(env.service_id, key_name).await {
		Ok(key) => key,
		Err(Error::NotFound) if app.opts.dynamic_config_keys => {
			let value_type = input.value_type.ok_or(Error::ValueTypeRequired)?;
			let create = CreateConfigKey::new(env.service_id, key_name, value_type);
			match app.key_store.create_config_key(&create).await {
				Ok(key) => {
					info!("created config key {} for {}", key, env);
					key
				}
				// lost a race with another creator
				Err(Error::Conflict(_)) => {
					app.key_store.read_config_key_by_name(env.service_id, key_name).await?
				}
				Err(err) => return Err(err),
			}
		}
		Err(err) => return Err(err),
	};

	let value = validate(Some(key.value_type), input.fields)?;

	let mut result =
		match app.value_store.read_config_value_by_env_and_key(env.id, &key.name).await {
			Ok(existing) => {
				app.value_store.update_config_value(&ConfigValue { value, ..existing }).await?
			}
			Err(Error::NotFound) => {
				app.value_store
					.create_config_value(&CreateConfigValue {
						environment_id: env.id,
						config_key_id: key.id,
						value,
					})
					.await?
			}
			Err(err) => return Err(err),
		};

	result.name = key.name;
	Ok(result)
}

// vim: ts=4
