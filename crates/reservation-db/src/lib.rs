// crates/reservation-db/src/lib.rs

//! Connection factory for the reservation database.
//!
//! Resolve a [`DatabaseConfig`] once (normally from `DB_HOST`, `DB_NAME`,
//! `DB_USER` and `DB_PASSWORD`), wrap it in a [`Database`], and call
//! [`Database::connect`] for a typed result or
//! [`Database::connect_or_report`] for the print-and-return-`None` variant.

pub mod config;
pub mod db;
pub mod error;

pub use config::DatabaseConfig;
pub use db::Database;
pub use error::{DatabaseError, Result};
