pub mod schema;
pub mod migrations;
pub mod helpers;
pub use helpers::{with_connection, SharedDatabase};

use rusqlite::{Connection, Result};
use std::path::Path;

/// Storage client owning the single SQLite connection.
///
/// Created once at startup and shared through [`SharedDatabase`]; the
/// connection is closed when the last handle is dropped at shutdown.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access, needed to open transactions.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
