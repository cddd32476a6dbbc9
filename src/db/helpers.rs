// src/db/helpers.rs

use crate::db::Database;
use crate::error::AppError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Handle to the storage client shared by every request.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Run a database operation on the blocking pool with lock handling and
/// error logging.
///
/// `operation` names the work for the log line, `label` identifies the
/// request it belongs to.
///
/// # Example
/// ```ignore
/// with_connection(&state.db, "[GET /categories/]", "select categories", move |conn| {
///     Category::find_all_for_user(conn, uid).map_err(AppError::from)
/// })
/// .await
/// ```
pub async fn with_connection<F, T>(
    db: &SharedDatabase,
    label: &str,
    operation: &'static str,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce(&mut Connection) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    let result = tokio::task::spawn_blocking(move || {
        let mut guard = db.lock().map_err(|_| AppError::LockPoisoned)?;
        f(guard.connection_mut())
    })
    .await
    .map_err(|e| AppError::Internal(format!("{operation}: {e}")))?;

    result.map_err(|e| {
        if e.status().is_server_error() {
            log::error!("{label} {operation}: {e}");
        } else {
            log::debug!("{label} {operation}: {e}");
        }
        e
    })
}
