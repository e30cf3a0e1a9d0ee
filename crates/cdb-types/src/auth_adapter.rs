//! Contract of the external capability provider consulted by the gate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
	#[serde(rename = "CAN_CONFIGURE_ENVIRONMENTS")]
	ConfigureEnvironments,
	#[serde(rename = "CAN_CONFIGURE_SENSITIVE_ENVIRONMENTS")]
	ConfigureSensitiveEnvironments,
	#[serde(rename = "CAN_MANAGE_ENVIRONMENTS")]
	ManageEnvironments,
	#[serde(rename = "CAN_MANAGE_CONFIG_KEYS")]
	ManageConfigKeys,
	#[serde(rename = "CAN_MANAGE_ROLES")]
	ManageRoles,
	#[serde(rename = "CAN_MANAGE_USERS")]
	ManageUsers,
}

impl Permission {
	pub fn as_str(self) -> &'static str {
		match self {
			Permission::ConfigureEnvironments => "CAN_CONFIGURE_ENVIRONMENTS",
			Permission::ConfigureSensitiveEnvironments => "CAN_CONFIGURE_SENSITIVE_ENVIRONMENTS",
			Permission::ManageEnvironments => "CAN_MANAGE_ENVIRONMENTS",
			Permission::ManageConfigKeys => "CAN_MANAGE_CONFIG_KEYS",
			Permission::ManageRoles => "CAN_MANAGE_ROLES",
			Permission::ManageUsers => "CAN_MANAGE_USERS",
		}
	}
}

impl std::fmt::Display for Permission {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Context struct for an authenticated caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
	pub user_id: i64,
	pub email: Box<str>,
}

impl Actor {
	pub fn new(user_id: i64, email: impl Into<Box<str>>) -> Self {
		Self { user_id, email: email.into() }
	}
}

#[async_trait]
pub trait AuthorizationGateway: Debug + Send + Sync {
	/// True when the actor holds at least one of `permissions`.
	///
	/// Transport or lookup failures are reported as errors, never as `false`.
	async fn has_permission(&self, actor: &Actor, permissions: &[Permission]) -> ClResult<bool>;
}

// vim: ts=4
