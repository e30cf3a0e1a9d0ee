//! Database schema initialization
//!
//! Creates tables and indexes. Every statement is idempotent so the schema
//! can be initialized on each start.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Services
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS services (
		id integer NOT NULL,
		name text NOT NULL,
		created_at integer NOT NULL DEFAULT (unixepoch()),
		PRIMARY KEY(id),
		UNIQUE(name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Environments
	//**************
	// A parent must belong to the same service.
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS environments (
		id integer NOT NULL,
		service_id integer NOT NULL REFERENCES services(id),
		name text NOT NULL,
		promotes_to_id integer,
		sensitive boolean NOT NULL DEFAULT 0,
		created_at integer NOT NULL DEFAULT (unixepoch()),
		PRIMARY KEY(id),
		UNIQUE(service_id, name),
		UNIQUE(id, service_id),
		FOREIGN KEY(promotes_to_id, service_id) REFERENCES environments(id, service_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_environments_promotes_to ON environments(promotes_to_id)",
	)
	.execute(&mut *tx)
	.await?;

	// Config keys
	//*************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS config_keys (
		id integer NOT NULL,
		service_id integer NOT NULL REFERENCES services(id),
		name text NOT NULL,
		value_type integer NOT NULL,
		can_propagate boolean NOT NULL DEFAULT 1,
		created_at integer NOT NULL DEFAULT (unixepoch()),
		PRIMARY KEY(id),
		UNIQUE(service_id, name),
		UNIQUE(id, service_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Config values
	//***************
	// Exactly one scalar column is populated; the (env, key) pair is unique.
	// Environment and key share the value's service.
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS config_values (
		id integer NOT NULL,
		service_id integer NOT NULL,
		env_id integer NOT NULL,
		key_id integer NOT NULL,
		str_value text,
		int_value integer,
		float_value real,
		bool_value boolean,
		created_at integer NOT NULL DEFAULT (unixepoch()),
		PRIMARY KEY(id),
		UNIQUE(env_id, key_id),
		FOREIGN KEY(env_id, service_id) REFERENCES environments(id, service_id),
		FOREIGN KEY(key_id, service_id) REFERENCES config_keys(id, service_id),
		CHECK ((str_value IS NOT NULL) + (int_value IS NOT NULL)
			+ (float_value IS NOT NULL) + (bool_value IS NOT NULL) = 1)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_config_values_key ON config_values(key_id)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;
	Ok(())
}

// vim: ts=4
