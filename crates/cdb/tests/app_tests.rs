//! App builder tests
//!
//! Wires a SQLite store from a db directory and drives a full flow through
//! the gate services.

use async_trait::async_trait;
use std::sync::Arc;
use tempfile::TempDir;

use cdb::auth_adapter::{Actor, AuthorizationGateway, Permission};
use cdb::error::{ClResult, Error};
use cdb::store_adapter::{CreateConfigKey, CreateEnvironment};
use cdb::value::{ValueInput, ValueType};
use cdb::{AppBuilder, Config};

/// Grants everything except sensitive configuration
#[derive(Debug)]
struct NoSensitiveGateway;

#[async_trait]
impl AuthorizationGateway for NoSensitiveGateway {
	async fn has_permission(&self, _actor: &Actor, permissions: &[Permission]) -> ClResult<bool> {
		Ok(permissions.iter().any(|p| *p != Permission::ConfigureSensitiveEnvironments))
	}
}

#[tokio::test]
async fn test_build_requires_every_adapter() {
	let res = AppBuilder::new().build();
	assert!(matches!(res, Err(Error::ConfigError(_))));

	let temp = TempDir::new().expect("Failed to create temp directory");
	let mut builder = AppBuilder::new();
	builder.db_dir(temp.path());
	builder.sqlite_store().await.expect("Should open store");
	assert!(matches!(builder.build(), Err(Error::ConfigError(_))), "gateway is missing");
}

#[tokio::test]
async fn test_config_is_applied() {
	let temp = TempDir::new().expect("Failed to create temp directory");
	let config = Config { db_dir: temp.path().join("nested"), dynamic_config_keys: false };

	let mut builder = AppBuilder::new();
	builder.config(&config).auth_gateway(Arc::new(NoSensitiveGateway));
	builder.sqlite_store().await.expect("Should open store");
	let app = builder.build().expect("Should build");

	assert!(!app.opts.dynamic_config_keys);
	assert!(temp.path().join("nested").join("cdb.db").exists());
}

#[tokio::test]
async fn test_end_to_end_flow() {
	let temp = TempDir::new().expect("Failed to create temp directory");
	let mut builder = AppBuilder::new();
	builder.db_dir(temp.path()).dynamic_config_keys(true).auth_gateway(Arc::new(NoSensitiveGateway));
	builder.sqlite_store().await.expect("Should open store");
	let app = builder.build().expect("Should build");
	let actor = Actor::new(7, "ops@example.com");

	let service = app.services().create_service(&actor, "billing").await.expect("service");
	let envs = app.environments();
	let create = |name: &str, parent, sensitive| CreateEnvironment {
		name: name.into(),
		service_id: service.id,
		promotes_to_id: parent,
		sensitive,
	};
	let production =
		envs.create_environment(&actor, &create("production", None, false)).await.expect("prod");
	let dev = envs
		.create_environment(&actor, &create("dev", Some(production.id), false))
		.await
		.expect("dev");
	let vault = envs
		.create_environment(&actor, &create("vault", Some(production.id), true))
		.await
		.expect("vault");

	app.config_keys()
		.create_config_key(&actor, &CreateConfigKey::new(service.id, "maxReplicas", ValueType::Integer))
		.await
		.expect("key");

	let values = app.config_values();
	values
		.set_configuration_value(&actor, production.id, "maxReplicas", ValueInput::integer(100))
		.await
		.expect("set on production");

	let resolved = values.get_configuration(&actor, dev.id).await.expect("resolve dev");
	assert_eq!(resolved.len(), 1);
	assert_eq!(resolved[0].inherited_from.as_deref(), Some("production"));

	let res = values
		.set_configuration_value(&actor, vault.id, "maxReplicas", ValueInput::integer(1))
		.await;
	assert!(matches!(res, Err(Error::Unauthorized)));
}

// vim: ts=4
