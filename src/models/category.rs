use rusqlite::{Connection, OptionalExtension, Result, TransactionBehavior, params};

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

impl Category {
    pub fn find_owned(conn: &Connection, id: i64, user_id: i64) -> Result<Option<Self>> {
        conn.query_row(
            "SELECT id, name, user_id FROM categories WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            |row| {
                Ok(Self {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    user_id: row.get(2)?,
                })
            },
        )
        .optional()
    }

    /// All categories of a user, in storage order.
    pub fn find_all_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, user_id FROM categories WHERE user_id = ?1 ORDER BY id"
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Self {
                id: row.get(0)?,
                name: row.get(1)?,
                user_id: row.get(2)?,
            })
        })?;

        rows.collect()
    }

    pub fn create(conn: &Connection, user_id: i64, name: &str) -> Result<Self> {
        conn.execute(
            "INSERT INTO categories (name, user_id) VALUES (?1, ?2)",
            params![name, user_id],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Self { id, name: name.to_string(), user_id })
    }

    /// Delete a category together with its activities in one transaction.
    ///
    /// Activities go first since foreign keys are enforced; their history
    /// rows follow through `ON DELETE CASCADE`. Returns `false` and deletes
    /// nothing when the user owns no such category.
    pub fn delete_with_activities(conn: &mut Connection, id: i64, user_id: i64) -> Result<bool> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let owned: i64 = tx.query_row(
            "SELECT COUNT(*) FROM categories WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            |row| row.get(0),
        )?;
        if owned == 0 {
            return Ok(false);
        }

        tx.execute("DELETE FROM activities WHERE category_id = ?1", params![id])?;
        tx.execute(
            "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;

        tx.commit()?;
        Ok(true)
    }
}
