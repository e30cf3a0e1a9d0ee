//! Config key operations
//!
//! Keys have no update or delete: a key's value type must never change once
//! values have been stored against it.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use cdb_types::prelude::*;
use cdb_types::store_adapter::{ConfigKey, CreateConfigKey};
use cdb_types::value::ValueType;

const SELECT: &str =
	"SELECT id, name, value_type, can_propagate, service_id, created_at FROM config_keys";

fn from_row(row: &SqliteRow) -> ClResult<ConfigKey> {
	let code: i64 = row.try_get("value_type").map_err(db_err)?;
	let value_type = ValueType::from_code(code).ok_or_else(|| {
		warn!("DB: unknown value type code {}", code);
		Error::DbError
	})?;
	Ok(ConfigKey {
		id: row.try_get("id").map(KeyId).map_err(db_err)?,
		name: row.try_get("name").map_err(db_err)?,
		value_type,
		can_propagate: row.try_get("can_propagate").map_err(db_err)?,
		service_id: row.try_get("service_id").map(ServiceId).map_err(db_err)?,
		created_at: row.try_get("created_at").map(Timestamp).map_err(db_err)?,
	})
}

pub(crate) async fn create(db: &SqlitePool, key: &CreateConfigKey) -> ClResult<ConfigKey> {
	let res = sqlx::query(
		"INSERT INTO config_keys (name, value_type, can_propagate, service_id) VALUES (?, ?, ?, ?)",
	)
	.bind(key.name.as_ref())
	.bind(key.value_type.code())
	.bind(key.propagates())
	.bind(key.service_id.0)
	.execute(db)
	.await
	.map_err(|err| match violation(&err) {
		Some(Violation::Unique) => {
			Error::Conflict(format!("config key '{}' already exists", key.name))
		}
		Some(Violation::ForeignKey) => Error::ReferenceError(Reference::Service),
		None => db_err(err),
	})?;

	read(db, KeyId(res.last_insert_rowid())).await
}

pub(crate) async fn read(db: &SqlitePool, id: KeyId) -> ClResult<ConfigKey> {
	let res = sqlx::query(&format!("{SELECT} WHERE id = ?")).bind(id.0).fetch_one(db).await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn read_by_name(
	db: &SqlitePool,
	service_id: ServiceId,
	name: &str,
) -> ClResult<ConfigKey> {
	let res = sqlx::query(&format!("{SELECT} WHERE service_id = ? AND name = ?"))
		.bind(service_id.0)
		.bind(name)
		.fetch_one(db)
		.await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn list(db: &SqlitePool, service_ids: &[ServiceId]) -> ClResult<Vec<ConfigKey>> {
	let mut query = sqlx::QueryBuilder::new(SELECT);
	if !service_ids.is_empty() {
		query.push(" WHERE service_id IN (");
		let mut ids = query.separated(", ");
		for id in service_ids {
			ids.push_bind(id.0);
		}
		ids.push_unseparated(")");
	}
	query.push(" ORDER BY id");

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	rows.iter().map(from_row).collect()
}

/// The service owning a key, `None` when there is no such key
pub(crate) async fn service_of(db: &SqlitePool, id: KeyId) -> ClResult<Option<ServiceId>> {
	let found: Option<i64> = sqlx::query_scalar("SELECT service_id FROM config_keys WHERE id = ?")
		.bind(id.0)
		.fetch_optional(db)
		.await
		.map_err(db_err)?;
	Ok(found.map(ServiceId))
}

// vim: ts=4
