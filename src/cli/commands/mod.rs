//! Command implementations.
//!
//! Each invocation is one request: open the store, resolve the acting user,
//! run one dashboard action and print the result.

pub mod advice;
pub mod alert;
pub mod budget;
pub mod completions;
pub mod config;
pub mod goal;
pub mod init;
pub mod profile;
pub mod subscription;
pub mod transaction;
pub mod version;

use crate::actions::Dashboard;
use crate::config::{load_config, resolve_db_path, resolve_user};
use crate::error::{ActionResult, Error, Result};
use crate::session::{SessionProvider, StaticSession};
use crate::storage::SqliteStorage;
use crate::views::LogInvalidator;
use serde::Serialize;
use std::path::PathBuf;

/// The store and collaborators for one CLI request.
pub struct Request {
    storage: SqliteStorage,
    session: StaticSession,
    views: LogInvalidator,
}

impl Request {
    /// Open the database and resolve the acting user.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` if the database does not exist yet,
    /// or a config/database error.
    pub fn open(db_path: Option<&PathBuf>, user: Option<&str>) -> Result<Self> {
        let db_path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or(Error::NotInitialized)?;
        if !db_path.exists() {
            return Err(Error::NotInitialized);
        }

        let storage = SqliteStorage::open(&db_path)?;
        let config = load_config()?;
        let session = StaticSession::from_optional(resolve_user(user, &config));

        Ok(Self {
            storage,
            session,
            views: LogInvalidator,
        })
    }

    /// Whether a user was resolved for this request.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.current_user().is_some()
    }

    pub fn dashboard(&mut self) -> Dashboard<'_> {
        Dashboard::new(&mut self.storage, &self.session, &self.views)
    }
}

/// Print a successful result as the `{"data": ...}` envelope or as text.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn emit<T: Serialize>(data: T, json: bool, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&ActionResult::Data(data))?);
    } else {
        human(&data);
    }
    Ok(())
}

/// Format an amount of money for terminal output.
pub(crate) fn money(amount: f64) -> String {
    format!("${amount:.2}")
}
