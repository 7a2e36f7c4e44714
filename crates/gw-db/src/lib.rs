//! gw-db - SQLite execution layer for Groundwork
//!
//! Owns the target-database connection and provides the applied-migration
//! [`Ledger`], the statement [`Executor`] (including the create/copy/drop/
//! rename rebuild pattern), and the [`Runner`] that orchestrates a full
//! migration pass.

pub mod connection;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod runner;

pub use connection::SqliteDb;
pub use error::{DbError, DbResult};
pub use executor::Executor;
pub use ledger::{Ledger, LedgerEntry};
pub use runner::{RunSummary, Runner};
