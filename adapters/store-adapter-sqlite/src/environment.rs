//! Environment operations
//!
//! Parent and service references are enforced by foreign keys, and a parent
//! must share the environment's service. When a check fails, the referenced
//! rows are looked up to report which one is missing or foreign.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::service;
use crate::utils::*;
use cdb_types::prelude::*;
use cdb_types::store_adapter::{CreateEnvironment, Environment};

const SELECT: &str =
	"SELECT id, name, service_id, promotes_to_id, sensitive, created_at FROM environments";

fn from_row(row: &SqliteRow) -> ClResult<Environment> {
	let promotes_to_id: Option<i64> = row.try_get("promotes_to_id").map_err(db_err)?;
	Ok(Environment {
		id: row.try_get("id").map(EnvId).map_err(db_err)?,
		name: row.try_get("name").map_err(db_err)?,
		service_id: row.try_get("service_id").map(ServiceId).map_err(db_err)?,
		promotes_to_id: promotes_to_id.map(EnvId),
		sensitive: row.try_get("sensitive").map_err(db_err)?,
		created_at: row.try_get("created_at").map(Timestamp).map_err(db_err)?,
	})
}

/// Work out which reference made a foreign key check fail
///
/// `fallback` is returned when every reference is intact.
async fn broken_reference(
	db: &SqlitePool,
	service_id: ServiceId,
	promotes_to_id: Option<EnvId>,
	fallback: Error,
) -> Error {
	match service::exists(db, service_id).await {
		Ok(false) => return Error::ReferenceError(Reference::Service),
		Err(err) => return err,
		Ok(true) => (),
	}
	let Some(parent) = promotes_to_id else {
		return fallback;
	};
	match service_of(db, parent).await {
		Ok(Some(parent_service)) if parent_service == service_id => fallback,
		Ok(Some(parent_service)) => {
			warn!("environment {} belongs to service {}, not {}", parent, parent_service, service_id);
			Error::ReferenceError(Reference::Environment)
		}
		Ok(None) => Error::ReferenceError(Reference::Environment),
		Err(err) => err,
	}
}

pub(crate) async fn create(db: &SqlitePool, env: &CreateEnvironment) -> ClResult<Environment> {
	let res = sqlx::query(
		"INSERT INTO environments (name, service_id, promotes_to_id, sensitive) VALUES (?, ?, ?, ?)",
	)
	.bind(env.name.as_ref())
	.bind(env.service_id.0)
	.bind(env.promotes_to_id.map(|id| id.0))
	.bind(env.sensitive)
	.execute(db)
	.await;

	let id = match res {
		Ok(res) => EnvId(res.last_insert_rowid()),
		Err(err) => {
			return Err(match violation(&err) {
				Some(Violation::Unique) => {
					Error::Conflict(format!("environment '{}' already exists", env.name))
				}
				Some(Violation::ForeignKey) => {
					broken_reference(db, env.service_id, env.promotes_to_id, Error::DbError).await
				}
				None => db_err(err),
			});
		}
	};

	read(db, id).await
}

pub(crate) async fn read(db: &SqlitePool, id: EnvId) -> ClResult<Environment> {
	let res = sqlx::query(&format!("{SELECT} WHERE id = ?")).bind(id.0).fetch_one(db).await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn read_by_name(
	db: &SqlitePool,
	service_id: ServiceId,
	name: &str,
) -> ClResult<Environment> {
	let res = sqlx::query(&format!("{SELECT} WHERE service_id = ? AND name = ?"))
		.bind(service_id.0)
		.bind(name)
		.fetch_one(db)
		.await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn list(db: &SqlitePool, include_sensitive: bool) -> ClResult<Vec<Environment>> {
	let sql = if include_sensitive {
		format!("{SELECT} ORDER BY id")
	} else {
		format!("{SELECT} WHERE sensitive = 0 ORDER BY id")
	};
	let rows = sqlx::query(&sql).fetch_all(db).await.map_err(db_err)?;
	debug!(count = rows.len(), include_sensitive, "retrieved environments");
	rows.iter().map(from_row).collect()
}

pub(crate) async fn update(db: &SqlitePool, env: &Environment) -> ClResult<Environment> {
	let res = sqlx::query(
		"UPDATE environments SET name = ?, service_id = ?, promotes_to_id = ?, sensitive = ?
		WHERE id = ?",
	)
	.bind(env.name.as_ref())
	.bind(env.service_id.0)
	.bind(env.promotes_to_id.map(|id| id.0))
	.bind(env.sensitive)
	.bind(env.id.0)
	.execute(db)
	.await;

	match res {
		Ok(res) if res.rows_affected() == 0 => return Err(Error::NotFound),
		Ok(_) => (),
		Err(err) => {
			return Err(match violation(&err) {
				Some(Violation::Unique) => {
					Error::Conflict(format!("environment '{}' already exists", env.name))
				}
				// values and promoting environments stay in the old service
				Some(Violation::ForeignKey) => {
					let moved = Error::Conflict(format!(
						"environment {} still has config values or promoting environments",
						env.id
					));
					broken_reference(db, env.service_id, env.promotes_to_id, moved).await
				}
				None => db_err(err),
			});
		}
	}

	read(db, env.id).await
}

pub(crate) async fn delete(db: &SqlitePool, id: EnvId) -> ClResult<()> {
	let res = sqlx::query("DELETE FROM environments WHERE id = ?")
		.bind(id.0)
		.execute(db)
		.await
		.map_err(|err| match violation(&err) {
			Some(Violation::ForeignKey) => Error::Conflict(format!(
				"environment {} still has config values or promoting environments",
				id
			)),
			_ => db_err(err),
		})?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// The service owning an environment, `None` when there is no such environment
pub(crate) async fn service_of(db: &SqlitePool, id: EnvId) -> ClResult<Option<ServiceId>> {
	let found: Option<i64> = sqlx::query_scalar("SELECT service_id FROM environments WHERE id = ?")
		.bind(id.0)
		.fetch_optional(db)
		.await
		.map_err(db_err)?;
	Ok(found.map(ServiceId))
}

// vim: ts=4
