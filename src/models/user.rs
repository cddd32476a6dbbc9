use rusqlite::{Connection, OptionalExtension, Result, params};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub provider_id: String,
    pub name: String,
    pub registered: i64,
}

impl User {
    /// Local id of the user registered under an identity-provider id.
    pub fn find_id_by_provider_id(conn: &Connection, provider_id: &str) -> Result<Option<i64>> {
        conn.query_row(
            "SELECT id FROM users WHERE fb_id = ?1",
            params![provider_id],
            |row| row.get(0),
        )
        .optional()
    }

    /// Insert a new user. A second insert for the same provider id fails with
    /// a UNIQUE constraint violation.
    pub fn create(conn: &Connection, provider_id: &str, name: &str, registered: i64) -> Result<Self> {
        conn.execute(
            "INSERT INTO users (registered, fb_id, name) VALUES (?1, ?2, ?3)",
            params![registered, provider_id, name],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Self {
            id,
            provider_id: provider_id.to_string(),
            name: name.to_string(),
            registered,
        })
    }
}
