//! Error type shared by the engine and every store adapter.

pub type ClResult<T> = std::result::Result<T, Error>;

/// The entity a failed foreign reference pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
	Environment,
	ConfigKey,
	Service,
}

impl std::fmt::Display for Reference {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Reference::Environment => write!(f, "environment"),
			Reference::ConfigKey => write!(f, "config key"),
			Reference::Service => write!(f, "service"),
		}
	}
}

#[derive(Debug)]
pub enum Error {
	/// Environment, key, value or service does not exist
	NotFound,
	/// A value already exists for the (environment, key) pair, or a name is taken
	Conflict(String),
	/// A config value does not match the type of its key
	NotValid(String),
	/// Dynamic key creation attempted without a declared value type
	ValueTypeRequired,
	/// A mutation references an entity that does not exist
	ReferenceError(Reference),
	/// A promotion chain would loop back on itself
	CycleDetected(String),
	/// The authorization gate denied the operation
	Unauthorized,

	// propagated
	DbError,
	Gateway(String),
	ConfigError(String),
	Internal(String),
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::NotValid(msg) => write!(f, "config value is not valid: {}", msg),
			Error::ValueTypeRequired => {
				write!(f, "value type must be set when dynamically creating a config key")
			}
			Error::ReferenceError(r) => write!(f, "referenced {} does not exist", r),
			Error::CycleDetected(msg) => write!(f, "promotion cycle: {}", msg),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::DbError => write!(f, "database error"),
			Error::Gateway(msg) => write!(f, "authorization gateway error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_reference_errors_are_distinguishable() {
		let env = Error::ReferenceError(Reference::Environment);
		let key = Error::ReferenceError(Reference::ConfigKey);

		assert!(matches!(env, Error::ReferenceError(Reference::Environment)));
		assert!(matches!(key, Error::ReferenceError(Reference::ConfigKey)));
		assert_eq!(env.to_string(), "referenced environment does not exist");
		assert_eq!(key.to_string(), "referenced config key does not exist");
	}
}

// vim: ts=4
