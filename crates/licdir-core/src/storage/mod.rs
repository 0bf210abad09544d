//! Storage layer - SQLite
//!
//! Provides database management and migrations for licdir.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and initialization
//! - `migrations`: Schema versioning and automatic migration

pub mod database;
pub mod migrations;

// Re-export commonly used types
pub use database::{Database, DatabaseConfig};
pub use migrations::{migration_status, run_migrations, MigrationStatus, CURRENT_VERSION};
