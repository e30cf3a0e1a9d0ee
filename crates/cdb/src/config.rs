//! Process configuration read from the environment
//!
//! - `CDB_DB_DIR`: directory holding the SQLite database, default `./data`
//! - `DYNAMIC_CONFIG_KEYS`: create unknown keys on first set, default `true`.
//!   Only a case-insensitive `true` enables it once the variable is set.

use std::path::PathBuf;

pub const DB_DIR_VAR: &str = "CDB_DB_DIR";
pub const DYNAMIC_CONFIG_KEYS_VAR: &str = "DYNAMIC_CONFIG_KEYS";

const DEFAULT_DB_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub db_dir: PathBuf,
	pub dynamic_config_keys: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self { db_dir: PathBuf::from(DEFAULT_DB_DIR), dynamic_config_keys: true }
	}
}

impl Config {
	pub fn from_env() -> Self {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds the config from an arbitrary variable source; empty values count as unset
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let var = |name: &str| lookup(name).filter(|val| !val.is_empty());

		let db_dir = var(DB_DIR_VAR).map_or_else(|| PathBuf::from(DEFAULT_DB_DIR), PathBuf::from);
		let dynamic_config_keys =
			var(DYNAMIC_CONFIG_KEYS_VAR).is_none_or(|val| val.eq_ignore_ascii_case("true"));

		Self { db_dir, dynamic_config_keys }
	}
}


// vim: ts=4
