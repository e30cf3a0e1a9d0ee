//! Service namespace operations

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use cdb_types::prelude::*;
use cdb_types::store_adapter::Service;

const SELECT: &str = "SELECT id, name, created_at FROM services";

fn from_row(row: &SqliteRow) -> ClResult<Service> {
	Ok(Service {
		id: row.try_get("id").map(ServiceId).map_err(db_err)?,
		name: row.try_get("name").map_err(db_err)?,
		created_at: row.try_get("created_at").map(Timestamp).map_err(db_err)?,
	})
}

pub(crate) async fn create(db: &SqlitePool, name: &str) -> ClResult<Service> {
	let res = sqlx::query("INSERT INTO services (name) VALUES (?)")
		.bind(name)
		.execute(db)
		.await
		.map_err(|err| match violation(&err) {
			Some(Violation::Unique) => Error::Conflict(format!("service '{}' already exists", name)),
			_ => db_err(err),
		})?;

	read(db, ServiceId(res.last_insert_rowid())).await
}

pub(crate) async fn read(db: &SqlitePool, id: ServiceId) -> ClResult<Service> {
	let res = sqlx::query(&format!("{SELECT} WHERE id = ?")).bind(id.0).fetch_one(db).await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn read_by_name(db: &SqlitePool, name: &str) -> ClResult<Service> {
	let res = sqlx::query(&format!("{SELECT} WHERE name = ?")).bind(name).fetch_one(db).await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<Service>> {
	let rows = sqlx::query(&format!("{SELECT} ORDER BY id"))
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	rows.iter().map(from_row).collect()
}

pub(crate) async fn exists(db: &SqlitePool, id: ServiceId) -> ClResult<bool> {
	let found: Option<i64> = sqlx::query_scalar("SELECT id FROM services WHERE id = ?")
		.bind(id.0)
		.fetch_optional(db)
		.await
		.map_err(db_err)?;
	Ok(found.is_some())
}

// vim: ts=4
