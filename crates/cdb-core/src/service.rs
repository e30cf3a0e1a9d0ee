//! Service namespaces behind the gate

use cdb_types::store_adapter::Service;

use crate::perm::{READ_ENVIRONMENTS, require_any};
use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct ServiceService {
	app: App,
}

impl ServiceService {
	pub fn new(app: App) -> Self {
		Self { app }
	}

	pub async fn create_service(&self, actor: &Actor, name: &str) -> ClResult<Service> {
		require_any(&self.app, actor, &[Permission::ManageEnvironments], "services").await?;
		let service = self.app.service_store.create_service(name).await?;
		info!("service '{}' created by user {}", service.name, actor.user_id);
		Ok(service)
	}

	pub async fn get_service(&self, actor: &Actor, id: ServiceId) -> ClResult<Service> {
		require_any(&self.app, actor, READ_ENVIRONMENTS, "services").await?;
		self.app.service_store.read_service(id).await
	}

	pub async fn get_service_by_name(&self, actor: &Actor, name: &str) -> ClResult<Service> {
		require_any(&self.app, actor, READ_ENVIRONMENTS, "services").await?;
		self.app.service_store.read_service_by_name(name).await
	}

	pub async fn list_services(&self, actor: &Actor) -> ClResult<Vec<Service>> {
		require_any(&self.app, actor, READ_ENVIRONMENTS, "services").await?;
		self.app.service_store.list_services().await
	}
}

// vim: ts=4
