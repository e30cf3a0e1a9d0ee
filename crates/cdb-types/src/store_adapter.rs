//! Store contracts for services, environments, config keys and config values.
//!
//! The engine is written against these traits only. A storage adapter
//! implements all four; every method is a single logical unit of work against
//! the backing store and returns the error kinds documented on it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;
use crate::value::{ConfigScalar, ValueType};

/// A service namespace partitioning keys and environments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
	pub id: ServiceId,
	pub name: Box<str>,
	pub created_at: Timestamp,
}

/// A deployment target, optionally promoting into a parent environment
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
	pub id: EnvId,
	pub name: Box<str>,
	pub service_id: ServiceId,
	pub promotes_to_id: Option<EnvId>,
	pub sensitive: bool,
	pub created_at: Timestamp,
}

impl std::fmt::Display for Environment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Environment(id={}, name={}, promotes_to={})",
			self.id,
			self.name,
			self.promotes_to_id.map_or(0, |id| id.0)
		)
	}
}

/// Data needed to create an environment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironment {
	pub name: Box<str>,
	pub service_id: ServiceId,
	pub promotes_to_id: Option<EnvId>,
	#[serde(default)]
	pub sensitive: bool,
}

/// Promotion forest node
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentTree {
	pub environment: Environment,
	pub children: Vec<EnvironmentTree>,
}

/// A typed, named configuration slot within a service namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigKey {
	pub id: KeyId,
	pub name: Box<str>,
	pub value_type: ValueType,
	pub can_propagate: bool,
	pub service_id: ServiceId,
	pub created_at: Timestamp,
}

impl std::fmt::Display for ConfigKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"ConfigKey(id={}, name={}, serviceId={}, canPropagate={})",
			self.id, self.name, self.service_id, self.can_propagate
		)
	}
}

/// Data needed to create a config key
///
/// `can_propagate` defaults to `true` when unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigKey {
	pub name: Box<str>,
	pub value_type: ValueType,
	pub can_propagate: Option<bool>,
	pub service_id: ServiceId,
}

impl CreateConfigKey {
	pub fn new(service_id: ServiceId, name: impl Into<Box<str>>, value_type: ValueType) -> Self {
		Self { name: name.into(), value_type, can_propagate: None, service_id }
	}

	pub fn propagates(&self) -> bool {
		self.can_propagate.unwrap_or(true)
	}
}

/// A scalar bound to one (environment, key) pair
///
/// `name` is denormalized from the key. `inherited` and `inherited_from` are
/// only ever set by resolution and are never persisted.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValue {
	pub id: ValueId,
	pub environment_id: EnvId,
	pub config_key_id: KeyId,
	pub name: Box<str>,
	#[serde(flatten)]
	pub value: ConfigScalar,
	pub created_at: Timestamp,
	pub inherited: bool,
	pub inherited_from: Option<Box<str>>,
}

impl ConfigValue {
	pub fn value_type(&self) -> ValueType {
		self.value.value_type()
	}

	/// Marks the value as resolved from the named ancestor environment
	pub fn inherit_from(mut self, env_name: &str) -> Self {
		self.inherited = true;
		self.inherited_from = Some(env_name.into());
		self
	}
}

impl std::fmt::Display for ConfigValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"ConfigValue(id={}, environment={}, keyID={}, name={}, valueType={}, value={})",
			self.id,
			self.environment_id,
			self.config_key_id,
			self.name,
			self.value_type(),
			self.value
		)
	}
}

/// Data needed to create a config value; the scalar is already validated
#[derive(Debug, Clone)]
pub struct CreateConfigValue {
	pub environment_id: EnvId,
	pub config_key_id: KeyId,
	pub value: ConfigScalar,
}

/// Filters for listing the values attached to one environment
#[derive(Debug, Clone, Default)]
pub struct ListConfigValueOptions {
	/// Only values whose key has `can_propagate` set
	pub propagating_only: bool,
	/// Key names to leave out
	pub exclude_keys: Vec<Box<str>>,
}

#[async_trait]
pub trait ServiceStore: Debug + Send + Sync {
	/// Fails with `Conflict` if the name is taken
	async fn create_service(&self, name: &str) -> ClResult<Service>;
	async fn read_service(&self, id: ServiceId) -> ClResult<Service>;
	async fn read_service_by_name(&self, name: &str) -> ClResult<Service>;
	async fn list_services(&self) -> ClResult<Vec<Service>>;
}

#[async_trait]
pub trait EnvironmentStore: Debug + Send + Sync {
	/// Fails with `ReferenceError` if the parent or service does not exist,
	/// `Conflict` if the name is taken within the service
	async fn create_environment(&self, env: &CreateEnvironment) -> ClResult<Environment>;
	/// Fails with `NotFound` if absent
	async fn read_environment(&self, id: EnvId) -> ClResult<Environment>;
	/// Fails with `NotFound` if absent
	async fn read_environment_by_name(
		&self,
		service_id: ServiceId,
		name: &str,
	) -> ClResult<Environment>;
	/// Sensitive environments are left out unless `include_sensitive` is set
	async fn list_environments(&self, include_sensitive: bool) -> ClResult<Vec<Environment>>;
	/// Fails with `NotFound` if the id does not exist, `ReferenceError` if the
	/// new parent does not exist
	async fn update_environment(&self, env: &Environment) -> ClResult<Environment>;
	/// Fails with `NotFound` if absent, `Conflict` while values or child
	/// environments still reference it
	async fn delete_environment(&self, id: EnvId) -> ClResult<()>;
}

#[async_trait]
pub trait ConfigKeyStore: Debug + Send + Sync {
	/// Fails with `ReferenceError` if the service does not exist, `Conflict`
	/// if the name is taken within the service
	async fn create_config_key(&self, key: &CreateConfigKey) -> ClResult<ConfigKey>;
	async fn read_config_key(&self, id: KeyId) -> ClResult<ConfigKey>;
	async fn read_config_key_by_name(&self, service_id: ServiceId, name: &str)
	-> ClResult<ConfigKey>;
	/// All keys when `service_ids` is empty, otherwise only keys in those services
	async fn list_config_keys(&self, service_ids: &[ServiceId]) -> ClResult<Vec<ConfigKey>>;
}

#[async_trait]
pub trait ConfigValueStore: Debug + Send + Sync {
	/// Fails with `Conflict` if a value already exists for the pair
	async fn create_config_value(&self, value: &CreateConfigValue) -> ClResult<ConfigValue>;
	/// Fails with `NotFound` if the value id does not exist, and with
	/// `ReferenceError(Environment)` / `ReferenceError(ConfigKey)` if the
	/// referenced environment or key no longer resolve
	async fn update_config_value(&self, value: &ConfigValue) -> ClResult<ConfigValue>;
	async fn read_config_value(&self, id: ValueId) -> ClResult<ConfigValue>;
	async fn read_config_value_by_env_and_key(
		&self,
		env_id: EnvId,
		key_name: &str,
	) -> ClResult<ConfigValue>;
	/// Values attached directly to `env_id`, ordered by key name
	async fn list_config_values(
		&self,
		env_id: EnvId,
		opts: &ListConfigValueOptions,
	) -> ClResult<Vec<ConfigValue>>;
}

// vim: ts=4
