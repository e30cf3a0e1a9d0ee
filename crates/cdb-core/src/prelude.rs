pub use cdb_types::prelude::*;

pub use crate::app::App;
pub use cdb_types::auth_adapter::{Actor, Permission};

// vim: ts=4
