//! Promotion forest helpers

use std::collections::{HashMap, HashSet};

use cdb_types::store_adapter::{Environment, EnvironmentTree};

use crate::prelude::*;

/// Rejects a parent link that would close a loop in the promotion forest
///
/// `id` is the environment being changed (`None` for one not yet created),
/// `parent` its candidate `promotes_to_id`. The chain starting at `parent` is
/// walked through `envs`; reaching `id` or revisiting a node is a cycle. An
/// unknown parent ends the walk, the store reports it as a reference error.
pub fn check_no_cycle(envs: &[Environment], id: Option<EnvId>, parent: Option<EnvId>) -> ClResult<()> {
	let parents: HashMap<EnvId, Option<EnvId>> =
		envs.iter().map(|env| (env.id, env.promotes_to_id)).collect();

	let mut seen = HashSet::new();
	let mut cur = parent;
	while let Some(env_id) = cur {
		if Some(env_id) == id {
			return Err(Error::CycleDetected(format!(
				"environment {} would promote into itself",
				env_id
			)));
		}
		if !seen.insert(env_id) {
			return Err(Error::CycleDetected(format!(
				"promotion chain loops at environment {}",
				env_id
			)));
		}
		cur = parents.get(&env_id).copied().flatten();
	}
	Ok(())
}

/// Rejects a parent from another service
///
/// Unknown parents pass, the store reports them.
pub fn check_same_service(
	envs: &[Environment],
	service_id: ServiceId,
	parent: Option<EnvId>,
) -> ClResult<()> {
	let Some(parent) = parent.and_then(|id| envs.iter().find(|env| env.id == id)) else {
		return Ok(());
	};
	if parent.service_id != service_id {
		warn!("{} belongs to service {}, not {}", parent, parent.service_id, service_id);
		return Err(Error::ReferenceError(Reference::Environment));
	}
	Ok(())
}

/// Builds the promotion forest, roots first and children in input order
///
/// Environments whose parent is not in `envs` are treated as roots. A loop
/// (only a direct store write can make one) has no root above it, so it is
/// cut at its first member in input order, which becomes a root.
pub fn build_tree(envs: Vec<Environment>) -> Vec<EnvironmentTree> {
	let ids: HashSet<EnvId> = envs.iter().map(|env| env.id).collect();

	let mut roots = Vec::new();
	let mut links = Vec::new();
	let mut children: HashMap<EnvId, Vec<Environment>> = HashMap::new();
	for env in envs {
		match env.promotes_to_id {
			Some(parent) if ids.contains(&parent) => {
				links.push((parent, env.id));
				children.entry(parent).or_default().push(env);
			}
			_ => roots.push(env),
		}
	}

	fn attach(env: Environment, children: &mut HashMap<EnvId, Vec<Environment>>) -> EnvironmentTree {
		let kids = children.remove(&env.id).unwrap_or_default();
		EnvironmentTree {
			environment: env,
			children: kids.into_iter().map(|child| attach(child, children)).collect(),
		}
	}

	let mut forest: Vec<EnvironmentTree> =
		roots.into_iter().map(|env| attach(env, &mut children)).collect();

	for (parent, id) in links {
		let Some(siblings) = children.get_mut(&parent) else { continue };
		let Some(pos) = siblings.iter().position(|env| env.id == id) else { continue };
		let env = siblings.remove(pos);
		warn!("{} is part of a promotion loop", env);
		forest.push(attach(env, &mut children));
	}

	forest
}


// vim: ts=4
