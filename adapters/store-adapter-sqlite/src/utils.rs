//! Shared utilities for the SQLite adapter
//!
//! Error mapping and query helpers used across all domain modules.

use cdb_types::prelude::*;
use sqlx::sqlite::SqliteRow;

/// Build an IN clause with parameterized values
pub(crate) fn push_in<'a>(
	query: &mut sqlx::QueryBuilder<'a, sqlx::Sqlite>,
	values: &'a [impl AsRef<str>],
) {
	query.push("(");
	for (i, value) in values.iter().enumerate() {
		if i > 0 {
			query.push(", ");
		}
		query.push_bind(value.as_ref());
	}
	query.push(")");
}

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> ClResult<T>,
{
	match row {
		Ok(row) => f(row),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Error translation for statements and column decodes with no special cases
pub(crate) fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

/// What kind of constraint a failed statement ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
	Unique,
	ForeignKey,
}

pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
	match err {
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Some(Violation::Unique),
		sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
			Some(Violation::ForeignKey)
		}
		_ => None,
	}
}

// vim: ts=4
