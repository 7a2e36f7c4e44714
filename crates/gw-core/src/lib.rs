//! gw-core - Migration model and discovery for Groundwork
//!
//! This crate defines the [`Migration`] unit, the statement-level script
//! parser, and the [`MigrationStore`] that discovers ordered migration
//! files from a directory.

pub mod error;
pub mod migration;
pub mod script;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use migration::Migration;
pub use store::MigrationStore;
