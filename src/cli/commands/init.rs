//! Create the dashboard database.
//!
//! By default the database lives at `~/.fin-dashboard/data/dashboard.db`
//! (`~/.fin-dashboard/test/dashboard.db` when `FIN_TEST_DB=1`). `--db`
//! or `FIN_DB` points it anywhere else.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    reinitialized: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns `Error::AlreadyInitialized` if the database exists and `force`
/// is not set, or an error if the directory or database cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    let existed = db_path.exists();
    if existed && !force {
        return Err(Error::AlreadyInitialized { path: db_path });
    }

    if existed {
        remove_database(&db_path)?;
    }
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Opening applies the schema.
    SqliteStorage::open(&db_path)?;

    let output = InitOutput {
        database: db_path,
        reinitialized: existed,
    };
    super::emit(output, json, |o| {
        println!("Initialized dashboard database");
        println!("  Database: {}", o.database.display());
        println!();
        println!("Next: fin --user <id> profile create --business-type \"...\" --income 5000");
    })
}

/// Remove the database file and its WAL sidecars.
fn remove_database(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_owned();
        sidecar.push(suffix);
        let sidecar = PathBuf::from(sidecar);
        if sidecar.exists() {
            fs::remove_file(sidecar)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_database() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("nested").join("dashboard.db");

        execute(Some(&db), false, true).unwrap();
        assert!(db.exists());

        let storage = SqliteStorage::open(&db).unwrap();
        assert!(storage.list_budgets("anyone").unwrap().is_empty());
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("dashboard.db");

        execute(Some(&db), false, true).unwrap();
        let result = execute(Some(&db), false, true);
        assert!(matches!(result, Err(Error::AlreadyInitialized { .. })));
    }

    #[test]
    fn test_init_force_resets_data() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("dashboard.db");
        execute(Some(&db), false, true).unwrap();

        {
            let mut storage = SqliteStorage::open(&db).unwrap();
            let budget = crate::model::Budget::new(
                "u1",
                crate::model::NewBudget {
                    category: "Tools".to_string(),
                    amount: 10.0,
                    period: "monthly".to_string(),
                },
            );
            storage.insert_budget(&budget).unwrap();
        }

        execute(Some(&db), true, true).unwrap();
        let storage = SqliteStorage::open(&db).unwrap();
        assert!(storage.list_budgets("u1").unwrap().is_empty());
    }
}
