pub use crate::error::{ClResult, Error, Reference};
pub use crate::types::{EnvId, KeyId, ServiceId, Timestamp, ValueId};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
