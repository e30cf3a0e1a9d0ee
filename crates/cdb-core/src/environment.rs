//! Environment CRUD behind the gate
//!
//! Mutations and the tree view need manage-environments. Reads are filtered
//! by `perm::read_visibility`: a sensitive environment the actor may not see
//! is reported as `NotFound`.
//!
//! A promotion chain stays inside one service. An environment may only move
//! to another service once nothing in the old one depends on it.

use cdb_types::store_adapter::{
	CreateEnvironment, Environment, EnvironmentTree, ListConfigValueOptions,
};

use crate::perm::{read_visibility, read_visible_environment, require_any};
use crate::prelude::*;
use crate::tree;

const MANAGE: &[Permission] = &[Permission::ManageEnvironments];

#[derive(Debug, Clone)]
pub struct EnvironmentService {
	app: App,
}

impl EnvironmentService {
	pub fn new(app: App) -> Self {
		Self { app }
	}

	pub async fn create_environment(
		&self,
		actor: &Actor,
		env: &CreateEnvironment,
	) -> ClResult<Environment> {
		require_any(&self.app, actor, MANAGE, &env.name).await?;
		if env.promotes_to_id.is_some() {
			let all = self.app.env_store.list_environments(true).await?;
			tree::check_no_cycle(&all, None, env.promotes_to_id)?;
			tree::check_same_service(&all, env.service_id, env.promotes_to_id)?;
		}

		let created = self.app.env_store.create_environment(env).await?;
		info!("{} created by user {}", created, actor.user_id);
		Ok(created)
	}

	pub async fn get_environment(&self, actor: &Actor, id: EnvId) -> ClResult<Environment> {
		read_visible_environment(&self.app, actor, id).await
	}

	pub async fn get_environment_by_name(
		&self,
		actor: &Actor,
		service_id: ServiceId,
		name: &str,
	) -> ClResult<Environment> {
		let visibility = read_visibility(&self.app, actor).await?;
		let env = self.app.env_store.read_environment_by_name(service_id, name).await?;
		if visibility.can_see(&env) { Ok(env) } else { Err(Error::NotFound) }
	}

	pub async fn list_environments(&self, actor: &Actor) -> ClResult<Vec<Environment>> {
		let visibility = read_visibility(&self.app, actor).await?;
		self.app.env_store.list_environments(visibility.include_sensitive()).await
	}

	pub async fn update_environment(&self, actor: &Actor, env: &Environment) -> ClResult<Environment> {
		require_any(&self.app, actor, MANAGE, &env.name).await?;
		let all = self.app.env_store.list_environments(true).await?;
		tree::check_no_cycle(&all, Some(env.id), env.promotes_to_id)?;
		tree::check_same_service(&all, env.service_id, env.promotes_to_id)?;

		let current = all.iter().find(|e| e.id == env.id).ok_or(Error::NotFound)?;
		if current.service_id != env.service_id {
			self.check_movable(current, &all).await?;
		}

		let updated = self.app.env_store.update_environment(env).await?;
		info!("{} updated by user {}", updated, actor.user_id);
		Ok(updated)
	}

	/// An environment holding values or promoted into leaves its service in place
	async fn check_movable(&self, env: &Environment, all: &[Environment]) -> ClResult<()> {
		let has_children = all.iter().any(|e| e.promotes_to_id == Some(env.id));
		let values = self
			.app
			.value_store
			.list_config_values(env.id, &ListConfigValueOptions::default())
			.await?;
		if has_children || !values.is_empty() {
			return Err(Error::Conflict(format!(
				"{} still has config values or promoting environments in service {}",
				env, env.service_id
			)));
		}
		Ok(())
	}

	pub async fn delete_environment(&self, actor: &Actor, id: EnvId) -> ClResult<()> {
		require_any(&self.app, actor, MANAGE, "environments").await?;
		self.app.env_store.delete_environment(id).await?;
		info!("environment {} deleted by user {}", id, actor.user_id);
		Ok(())
	}

	pub async fn get_environment_tree(&self, actor: &Actor) -> ClResult<Vec<EnvironmentTree>> {
		require_any(&self.app, actor, MANAGE, "environments").await?;
		let all = self.app.env_store.list_environments(true).await?;
		Ok(tree::build_tree(all))
	}
}

// vim: ts=4
