pub use cdb_core::prelude::*;

// vim: ts=4
