//! Authorization gate tests
//!
//! Each operation is called by actors holding different permission sets;
//! gateway failures must surface unchanged.

mod common;

use cdb_core::NewConfigValue;
use cdb_types::auth_adapter::Permission;
use cdb_types::prelude::*;
use cdb_types::store_adapter::{ConfigKeyStore, CreateConfigKey, CreateEnvironment, ServiceStore};
use cdb_types::value::{ConfigScalar, ValueInput, ValueType};
use common::setup;

const CONFIGURE: &[Permission] = &[Permission::ConfigureEnvironments];
const CONFIGURE_SENSITIVE: &[Permission] = &[Permission::ConfigureSensitiveEnvironments];
const MANAGE: &[Permission] = &[Permission::ManageEnvironments];
const MANAGE_KEYS: &[Permission] = &[Permission::ManageConfigKeys];

#[tokio::test]
async fn test_sensitive_set_needs_sensitive_permission() {
	let fx = setup(true).await;
	let vault = fx.sensitive_env("vault", Some(&fx.production)).await;
	fx.key("owner", ValueType::String, true).await;
	let values = fx.app.config_values();

	let configurer = fx.actor(10, CONFIGURE);
	let res = values
		.set_configuration_value(&configurer, vault.id, "owner", ValueInput::string("x"))
		.await;
	assert!(matches!(res, Err(Error::Unauthorized)));

	let sensitive = fx.actor(11, CONFIGURE_SENSITIVE);
	values
		.set_configuration_value(&sensitive, vault.id, "owner", ValueInput::string("x"))
		.await
		.expect("Sensitive configurer may set");

	// the general permission still covers ordinary environments
	values
		.set_configuration_value(&configurer, fx.dev.id, "owner", ValueInput::string("y"))
		.await
		.expect("Configurer may set on dev");
	values
		.set_configuration_value(&sensitive, fx.dev.id, "owner", ValueInput::string("z"))
		.await
		.expect("Sensitive configurer may set on dev");
}

#[tokio::test]
async fn test_value_writes_without_permission() {
	let fx = setup(true).await;
	let owner = fx.key("owner", ValueType::String, true).await;
	let values = fx.app.config_values();
	let manager = fx.actor(20, MANAGE);

	let res =
		values.set_configuration_value(&manager, fx.dev.id, "owner", ValueInput::string("x")).await;
	assert!(matches!(res, Err(Error::Unauthorized)));

	let res = values
		.set_configuration_values(
			&manager,
			fx.dev.id,
			vec![cdb_core::SetConfigValue::new("owner", ValueInput::string("x"))],
		)
		.await;
	assert!(matches!(res, Err(Error::Unauthorized)));

	let res = values
		.create_config_value(
			&manager,
			NewConfigValue {
				environment_id: fx.dev.id,
				config_key_id: owner.id,
				value: ValueInput::string("x"),
			},
		)
		.await;
	assert!(matches!(res, Err(Error::Unauthorized)));
}

#[tokio::test]
async fn test_environment_visibility() {
	let fx = setup(true).await;
	let vault = fx.sensitive_env("vault", None).await;
	let envs = fx.app.environments();

	let configurer = fx.actor(30, CONFIGURE);
	let sensitive = fx.actor(31, CONFIGURE_SENSITIVE);
	let manager = fx.actor(32, MANAGE);
	let nobody = fx.actor(33, &[Permission::ManageUsers]);

	assert_eq!(envs.list_environments(&configurer).await.expect("list").len(), 3);
	assert_eq!(envs.list_environments(&sensitive).await.expect("list").len(), 4);
	assert_eq!(envs.list_environments(&manager).await.expect("list").len(), 4);
	assert!(matches!(envs.list_environments(&nobody).await, Err(Error::Unauthorized)));

	assert!(matches!(envs.get_environment(&configurer, vault.id).await, Err(Error::NotFound)));
	assert!(matches!(
		envs.get_environment_by_name(&configurer, fx.service.id, "vault").await,
		Err(Error::NotFound)
	));
	assert_eq!(envs.get_environment(&sensitive, vault.id).await.expect("get"), vault);
	assert_eq!(envs.get_environment(&manager, vault.id).await.expect("get"), vault);
	assert_eq!(envs.get_environment(&configurer, fx.dev.id).await.expect("get"), fx.dev);
	assert!(matches!(envs.get_environment(&nobody, fx.dev.id).await, Err(Error::Unauthorized)));
}

#[tokio::test]
async fn test_configuration_reads_follow_visibility() {
	let fx = setup(true).await;
	let vault = fx.sensitive_env("vault", Some(&fx.production)).await;
	let owner = fx.key("owner", ValueType::String, true).await;
	fx.value(&vault, &owner, ConfigScalar::Str("secops".into())).await;
	let values = fx.app.config_values();

	let configurer = fx.actor(40, CONFIGURE);
	assert!(matches!(values.get_configuration(&configurer, vault.id).await, Err(Error::NotFound)));
	assert!(matches!(
		values.get_configuration_value(&configurer, vault.id, "owner").await,
		Err(Error::NotFound)
	));
	assert!(values.get_configuration(&configurer, fx.dev.id).await.is_ok());

	let sensitive = fx.actor(41, CONFIGURE_SENSITIVE);
	let resolved = values.get_configuration(&sensitive, vault.id).await.expect("Should resolve");
	assert_eq!(resolved.len(), 1);

	let nobody = fx.actor(42, MANAGE_KEYS);
	assert!(matches!(
		values.get_configuration(&nobody, fx.dev.id).await,
		Err(Error::Unauthorized)
	));
}

#[tokio::test]
async fn test_environment_mutations_need_manage() {
	let fx = setup(true).await;
	let envs = fx.app.environments();
	let configurer = fx.actor(50, CONFIGURE);
	let manager = fx.actor(51, MANAGE);
	let create = CreateEnvironment {
		name: "qa".into(),
		service_id: fx.service.id,
		promotes_to_id: Some(fx.staging.id),
		sensitive: false,
	};

	assert!(matches!(envs.create_environment(&configurer, &create).await, Err(Error::Unauthorized)));
	let qa = envs.create_environment(&manager, &create).await.expect("Should create");

	let mut renamed = qa.clone();
	renamed.name = "qa2".into();
	assert!(matches!(envs.update_environment(&configurer, &renamed).await, Err(Error::Unauthorized)));
	assert_eq!(envs.update_environment(&manager, &renamed).await.expect("update").name.as_ref(), "qa2");

	assert!(matches!(envs.get_environment_tree(&configurer).await, Err(Error::Unauthorized)));
	assert!(matches!(envs.delete_environment(&configurer, qa.id).await, Err(Error::Unauthorized)));
	envs.delete_environment(&manager, qa.id).await.expect("Should delete");
}

#[tokio::test]
async fn test_update_rejects_cycles() {
	let fx = setup(true).await;
	let envs = fx.app.environments();

	let mut production = fx.production.clone();
	production.promotes_to_id = Some(fx.dev.id);
	assert!(matches!(
		envs.update_environment(&fx.admin, &production).await,
		Err(Error::CycleDetected(_))
	));

	let mut dev = fx.dev.clone();
	dev.promotes_to_id = Some(dev.id);
	assert!(matches!(envs.update_environment(&fx.admin, &dev).await, Err(Error::CycleDetected(_))));

	// moving dev directly under production is fine
	dev.promotes_to_id = Some(fx.production.id);
	envs.update_environment(&fx.admin, &dev).await.expect("Should update");
}

#[tokio::test]
async fn test_value_key_must_share_service() {
	let fx = setup(true).await;
	let search = fx.store.create_service("search").await.expect("Should create service");
	let foreign = fx
		.store
		.create_config_key(&CreateConfigKey::new(search.id, "owner", ValueType::String))
		.await
		.expect("Should create key");
	let values = fx.app.config_values();

	values
		.set_configuration_value(&fx.admin, fx.dev.id, "owner", ValueInput::string("local"))
		.await
		.expect("Should set local owner");

	let res = values
		.create_config_value(
			&fx.admin,
			NewConfigValue {
				environment_id: fx.dev.id,
				config_key_id: foreign.id,
				value: ValueInput::string("foreign"),
			},
		)
		.await;
	assert!(matches!(res, Err(Error::ReferenceError(Reference::ConfigKey))));

	let resolved = values.get_configuration(&fx.admin, fx.dev.id).await.expect("Should resolve");
	assert_eq!(resolved.len(), 1, "each name appears once");
	assert_eq!(resolved[0].value, ConfigScalar::Str("local".into()));
	assert_ne!(resolved[0].config_key_id, foreign.id);
}

#[tokio::test]
async fn test_parent_must_share_service() {
	let fx = setup(true).await;
	let search = fx.store.create_service("search").await.expect("Should create service");
	let envs = fx.app.environments();

	let res = envs
		.create_environment(
			&fx.admin,
			&CreateEnvironment {
				name: "dev".into(),
				service_id: search.id,
				promotes_to_id: Some(fx.production.id),
				sensitive: false,
			},
		)
		.await;
	assert!(matches!(res, Err(Error::ReferenceError(Reference::Environment))));

	let search_prod = envs
		.create_environment(
			&fx.admin,
			&CreateEnvironment {
				name: "production".into(),
				service_id: search.id,
				promotes_to_id: None,
				sensitive: false,
			},
		)
		.await
		.expect("Should create production");

	let mut dev = fx.dev.clone();
	dev.promotes_to_id = Some(search_prod.id);
	assert!(matches!(
		envs.update_environment(&fx.admin, &dev).await,
		Err(Error::ReferenceError(Reference::Environment))
	));
}

#[tokio::test]
async fn test_service_move_needs_empty_environment() {
	let fx = setup(true).await;
	let search = fx.store.create_service("search").await.expect("Should create service");
	let owner = fx.key("owner", ValueType::String, true).await;
	fx.value(&fx.dev, &owner, ConfigScalar::Str("devs".into())).await;
	let envs = fx.app.environments();

	// dev holds a value bound to a billing key
	let mut dev = fx.dev.clone();
	dev.service_id = search.id;
	dev.promotes_to_id = None;
	assert!(matches!(envs.update_environment(&fx.admin, &dev).await, Err(Error::Conflict(_))));

	// dev still promotes into staging
	let mut staging = fx.staging.clone();
	staging.service_id = search.id;
	staging.promotes_to_id = None;
	assert!(matches!(envs.update_environment(&fx.admin, &staging).await, Err(Error::Conflict(_))));

	let sandbox = common::create_env(&fx.store, &fx.service, "sandbox", None).await;
	let mut moved = sandbox.clone();
	moved.service_id = search.id;
	let moved = envs.update_environment(&fx.admin, &moved).await.expect("Should move");
	assert_eq!(moved.service_id, search.id);

	let owner = fx
		.app
		.config_values()
		.get_configuration_value(&fx.admin, fx.dev.id, "owner")
		.await
		.expect("Should still resolve");
	assert_eq!(owner.value, ConfigScalar::Str("devs".into()));
}

#[tokio::test]
async fn test_environment_tree() {
	let fx = setup(true).await;
	let side = common::create_env(&fx.store, &fx.service, "sandbox", None).await;

	let tree = fx.app.environments().get_environment_tree(&fx.admin).await.expect("Should build");

	assert_eq!(tree.len(), 2);
	assert_eq!(tree[0].environment, fx.production);
	assert_eq!(tree[0].children[0].environment, fx.staging);
	assert_eq!(tree[0].children[0].children[0].environment, fx.dev);
	assert_eq!(tree[1].environment, side);
}

#[tokio::test]
async fn test_config_key_permissions() {
	let fx = setup(true).await;
	let keys = fx.app.config_keys();
	let configurer = fx.actor(60, CONFIGURE);
	let key_manager = fx.actor(61, MANAGE_KEYS);
	let manager = fx.actor(62, MANAGE);
	let create = CreateConfigKey::new(fx.service.id, "owner", ValueType::String);

	assert!(matches!(keys.create_config_key(&configurer, &create).await, Err(Error::Unauthorized)));
	let key = keys.create_config_key(&key_manager, &create).await.expect("Should create");

	assert_eq!(keys.get_config_key(&configurer, key.id).await.expect("get"), key);
	assert_eq!(
		keys.get_config_key_by_name(&key_manager, fx.service.id, "owner").await.expect("get"),
		key
	);
	assert_eq!(keys.list_config_keys(&configurer, &[fx.service.id]).await.expect("list").len(), 1);
	assert!(matches!(keys.list_config_keys(&manager, &[]).await, Err(Error::Unauthorized)));
}

#[tokio::test]
async fn test_service_permissions() {
	let fx = setup(true).await;
	let services = fx.app.services();
	let configurer = fx.actor(70, CONFIGURE);
	let manager = fx.actor(71, MANAGE);

	assert!(matches!(services.create_service(&configurer, "search").await, Err(Error::Unauthorized)));
	let search = services.create_service(&manager, "search").await.expect("Should create");

	assert_eq!(services.get_service_by_name(&configurer, "search").await.expect("get"), search);
	assert_eq!(services.get_service(&manager, search.id).await.expect("get"), search);
	assert_eq!(services.list_services(&configurer).await.expect("list").len(), 2);

	let nobody = fx.actor(72, MANAGE_KEYS);
	assert!(matches!(services.list_services(&nobody).await, Err(Error::Unauthorized)));
}

#[tokio::test]
async fn test_gateway_errors_propagate() {
	let fx = setup(true).await;
	fx.gateway.fail_with("directory unreachable");

	let res = fx
		.app
		.config_values()
		.set_configuration_value(&fx.admin, fx.dev.id, "owner", ValueInput::string("x"))
		.await;
	assert!(matches!(res, Err(Error::Gateway(_))));

	let res = fx.app.config_values().get_configuration(&fx.admin, fx.dev.id).await;
	assert!(matches!(res, Err(Error::Gateway(_))));

	let res = fx.app.environments().list_environments(&fx.admin).await;
	assert!(matches!(res, Err(Error::Gateway(_))));
}

// vim: ts=4
