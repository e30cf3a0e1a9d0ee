//! Capability checks shared by the gate services
//!
//! Gateway failures are returned as-is; only a `false` answer becomes
//! `Unauthorized`.

use cdb_types::store_adapter::Environment;

use crate::app::AppState;
use crate::prelude::*;

/// Permissions that allow reading environments and their configuration
pub const READ_ENVIRONMENTS: &[Permission] = &[
	Permission::ManageEnvironments,
	Permission::ConfigureEnvironments,
	Permission::ConfigureSensitiveEnvironments,
];

/// Permissions that allow reading config keys and services
pub const READ_CONFIG_KEYS: &[Permission] = &[
	Permission::ManageConfigKeys,
	Permission::ConfigureEnvironments,
	Permission::ConfigureSensitiveEnvironments,
];

/// How much of the environment forest an actor may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
	All,
	NonSensitive,
}

impl Visibility {
	pub fn include_sensitive(self) -> bool {
		self == Visibility::All
	}

	pub fn can_see(self, env: &Environment) -> bool {
		self.include_sensitive() || !env.sensitive
	}
}

fn deny(actor: &Actor, permissions: &[Permission], resource: &str) -> Error {
	warn!(
		user_id = actor.user_id,
		email = %actor.email,
		permissions = ?permissions,
		resource,
		"permission denied"
	);
	Error::Unauthorized
}

/// Passes when the actor holds at least one of `permissions`
pub async fn require_any(
	app: &AppState,
	actor: &Actor,
	permissions: &[Permission],
	resource: &str,
) -> ClResult<()> {
	if app.auth_gateway.has_permission(actor, permissions).await? {
		Ok(())
	} else {
		Err(deny(actor, permissions, resource))
	}
}

/// Widens visibility with each permission held: manage and configure-sensitive
/// see everything, configure sees non-sensitive environments only
pub async fn read_visibility(app: &AppState, actor: &Actor) -> ClResult<Visibility> {
	let gateway = &app.auth_gateway;
	if gateway.has_permission(actor, &[Permission::ManageEnvironments]).await?
		|| gateway.has_permission(actor, &[Permission::ConfigureSensitiveEnvironments]).await?
	{
		return Ok(Visibility::All);
	}
	if gateway.has_permission(actor, &[Permission::ConfigureEnvironments]).await? {
		return Ok(Visibility::NonSensitive);
	}
	Err(deny(actor, READ_ENVIRONMENTS, "environments"))
}

/// Reads an environment, reporting it as absent when the actor may not see it
pub async fn read_visible_environment(
	app: &AppState,
	actor: &Actor,
	env_id: EnvId,
) -> ClResult<Environment> {
	let visibility = read_visibility(app, actor).await?;
	let env = app.env_store.read_environment(env_id).await?;
	if visibility.can_see(&env) {
		Ok(env)
	} else {
		debug!("hiding sensitive {} from user {}", env, actor.user_id);
		Err(Error::NotFound)
	}
}

/// Value mutations need configure on ordinary environments and
/// configure-sensitive on sensitive ones
pub async fn can_configure_environment(
	app: &AppState,
	actor: &Actor,
	env: &Environment,
) -> ClResult<()> {
	let required: &[Permission] = if env.sensitive {
		&[Permission::ConfigureSensitiveEnvironments]
	} else {
		&[Permission::ConfigureEnvironments, Permission::ConfigureSensitiveEnvironments]
	};
	require_any(app, actor, required, &env.name).await
}

// vim: ts=4
