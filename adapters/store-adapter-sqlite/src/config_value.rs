//! Config value operations
//!
//! The at-most-one-value invariant rests on the UNIQUE(env_id, key_id)
//! constraint: of several concurrent creators for one pair exactly one
//! insert succeeds and the others observe `Conflict`.
//!
//! Each row carries the environment's service, and composite foreign keys
//! bind both the environment and the key to it. A key from another service
//! is reported as a missing key reference.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use crate::{config_key, environment};
use cdb_types::prelude::*;
use cdb_types::store_adapter::{ConfigValue, CreateConfigValue, ListConfigValueOptions};
use cdb_types::value::{ScalarFields, ValueType, validate};

const SELECT: &str = "SELECT v.id, v.env_id, v.key_id, k.name, k.value_type,
	v.str_value, v.int_value, v.float_value, v.bool_value, v.created_at
	FROM config_values v
	JOIN config_keys k ON k.id = v.key_id";

fn from_row(row: &SqliteRow) -> ClResult<ConfigValue> {
	let code: i64 = row.try_get("value_type").map_err(db_err)?;
	let fields = ScalarFields {
		str_value: row.try_get("str_value").map_err(db_err)?,
		int_value: row.try_get("int_value").map_err(db_err)?,
		float_value: row.try_get("float_value").map_err(db_err)?,
		bool_value: row.try_get("bool_value").map_err(db_err)?,
	};
	let value = validate(ValueType::from_code(code), fields).map_err(|err| {
		warn!("DB: stored config value does not match its key: {}", err);
		Error::DbError
	})?;

	Ok(ConfigValue {
		id: row.try_get("id").map(ValueId).map_err(db_err)?,
		environment_id: row.try_get("env_id").map(EnvId).map_err(db_err)?,
		config_key_id: row.try_get("key_id").map(KeyId).map_err(db_err)?,
		name: row.try_get("name").map_err(db_err)?,
		value,
		created_at: row.try_get("created_at").map(Timestamp).map_err(db_err)?,
		inherited: false,
		inherited_from: None,
	})
}

/// Work out which reference made a foreign key check fail
async fn broken_reference(db: &SqlitePool, env_id: EnvId, key_id: KeyId) -> Error {
	let service_id = match environment::service_of(db, env_id).await {
		Ok(Some(service_id)) => service_id,
		Ok(None) => return Error::ReferenceError(Reference::Environment),
		Err(err) => return err,
	};
	match config_key::service_of(db, key_id).await {
		Ok(Some(key_service)) if key_service == service_id => Error::DbError,
		Ok(Some(key_service)) => {
			warn!("config key {} belongs to service {}, not {}", key_id, key_service, service_id);
			Error::ReferenceError(Reference::ConfigKey)
		}
		Ok(None) => Error::ReferenceError(Reference::ConfigKey),
		Err(err) => err,
	}
}

/// Service of the environment a value is stored under
async fn env_service(db: &SqlitePool, env_id: EnvId) -> ClResult<ServiceId> {
	environment::service_of(db, env_id).await?.ok_or(Error::ReferenceError(Reference::Environment))
}

pub(crate) async fn create(db: &SqlitePool, value: &CreateConfigValue) -> ClResult<ConfigValue> {
	let fields = validate(Some(value.value.value_type()), value.value.to_fields())?.to_fields();
	let service_id = env_service(db, value.environment_id).await?;
	let res = sqlx::query(
		"INSERT INTO config_values
		(service_id, env_id, key_id, str_value, int_value, float_value, bool_value)
		VALUES (?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(service_id.0)
	.bind(value.environment_id.0)
	.bind(value.config_key_id.0)
	.bind(fields.str_value)
	.bind(fields.int_value)
	.bind(fields.float_value)
	.bind(fields.bool_value)
	.execute(db)
	.await;

	let id = match res {
		Ok(res) => ValueId(res.last_insert_rowid()),
		Err(err) => {
			return Err(match violation(&err) {
				Some(Violation::Unique) => Error::Conflict(format!(
					"config value is already set for key {} in environment {}",
					value.config_key_id, value.environment_id
				)),
				Some(Violation::ForeignKey) => {
					broken_reference(db, value.environment_id, value.config_key_id).await
				}
				None => db_err(err),
			});
		}
	};

	read(db, id).await
}

pub(crate) async fn update(db: &SqlitePool, value: &ConfigValue) -> ClResult<ConfigValue> {
	let fields = validate(Some(value.value.value_type()), value.value.to_fields())?.to_fields();
	let service_id = env_service(db, value.environment_id).await?;
	let res = sqlx::query(
		"UPDATE config_values SET service_id = ?, env_id = ?, key_id = ?,
		str_value = ?, int_value = ?, float_value = ?, bool_value = ?
		WHERE id = ?",
	)
	.bind(service_id.0)
	.bind(value.environment_id.0)
	.bind(value.config_key_id.0)
	.bind(fields.str_value)
	.bind(fields.int_value)
	.bind(fields.float_value)
	.bind(fields.bool_value)
	.bind(value.id.0)
	.execute(db)
	.await;

	match res {
		Ok(res) if res.rows_affected() == 0 => return Err(Error::NotFound),
		Ok(_) => (),
		Err(err) => {
			return Err(match violation(&err) {
				Some(Violation::Unique) => Error::Conflict(format!(
					"config value is already set for key {} in environment {}",
					value.config_key_id, value.environment_id
				)),
				Some(Violation::ForeignKey) => {
					broken_reference(db, value.environment_id, value.config_key_id).await
				}
				None => db_err(err),
			});
		}
	}

	read(db, value.id).await
}

pub(crate) async fn read(db: &SqlitePool, id: ValueId) -> ClResult<ConfigValue> {
	let res = sqlx::query(&format!("{SELECT} WHERE v.id = ?")).bind(id.0).fetch_one(db).await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn read_by_env_and_key(
	db: &SqlitePool,
	env_id: EnvId,
	key_name: &str,
) -> ClResult<ConfigValue> {
	let res = sqlx::query(&format!("{SELECT} WHERE v.env_id = ? AND k.name = ?"))
		.bind(env_id.0)
		.bind(key_name)
		.fetch_one(db)
		.await;
	map_res(res, |row| from_row(&row))
}

pub(crate) async fn list(
	db: &SqlitePool,
	env_id: EnvId,
	opts: &ListConfigValueOptions,
) -> ClResult<Vec<ConfigValue>> {
	let mut query = sqlx::QueryBuilder::new(SELECT);
	query.push(" WHERE v.env_id = ").push_bind(env_id.0);
	if opts.propagating_only {
		query.push(" AND k.can_propagate = 1");
	}
	if !opts.exclude_keys.is_empty() {
		query.push(" AND k.name NOT IN ");
		push_in(&mut query, &opts.exclude_keys);
	}
	query.push(" ORDER BY k.name");

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	rows.iter().map(from_row).collect()
}

// vim: ts=4
