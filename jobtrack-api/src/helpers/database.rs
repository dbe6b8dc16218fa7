use std::path::PathBuf;
use std::sync::Arc;

use crate::database::Database;

/// Returns the default path of the jobtrack database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/jobtrack/db.sqlite3`
/// - **Linux**: `~/.local/share/jobtrack/db.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\jobtrack\db.sqlite3`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("jobtrack").join("db.sqlite3"))
}

/// Open the database at `path_override`, or at [`get_db_path`] when unset
pub fn initialize_database(path_override: Option<PathBuf>) -> anyhow::Result<Arc<Database>> {
    let db_path = match path_override {
        Some(path) => path,
        None => get_db_path()?,
    };

    let db = Database::new(&db_path)?;
    tracing::info!("Database initialized at: {:?}", db_path);

    Ok(Arc::new(db))
}
