use crate::error::HistoryError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub mod history;

mod embedded {
    refinery::embed_migrations!("migrations");
}

pub fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\study-session")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/study-session")
    }
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("history.db")
}

pub fn init_db(path: &Path) -> Result<Connection, HistoryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let mut conn = Connection::open(path)?;
    run_migrations(&mut conn)?;

    Ok(conn)
}

pub fn run_migrations(conn: &mut Connection) -> Result<(), HistoryError> {
    let report = embedded::migrations::runner().run(conn)?;
    for migration in report.applied_migrations() {
        tracing::info!(
            version = migration.version(),
            name = migration.name(),
            "applied migration"
        );
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn open_in_memory() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    run_migrations(&mut conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_creates_directory_and_tables() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("history.db");
        let conn = init_db(&path).unwrap();
        assert!(path.exists());

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"history".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = db_path(temp_dir.path());
        drop(init_db(&path).unwrap());
        assert!(init_db(&path).is_ok());
    }
}
