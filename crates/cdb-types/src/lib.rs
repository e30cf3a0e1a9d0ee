//! Shared types, store contracts, and core utilities for cdb.
//!
//! This crate contains the foundational types that are shared between the
//! engine crate and all store adapter implementations. Keeping them in a
//! separate crate lets adapters compile without pulling in the engine.

pub mod auth_adapter;
pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod value;

// vim: ts=4
