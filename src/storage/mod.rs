//! SQLite storage layer for the dashboard.
//!
//! This is the persistence gateway: table-oriented row CRUD where every
//! statement is filtered by the owning user id.
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStorage;
