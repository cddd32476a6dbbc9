use rusqlite::{Connection, OptionalExtension, Result, TransactionBehavior, params};

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: i64,
    pub name: String,
    /// Target number of repetitions per day
    pub npom: i32,
    pub category_id: i64,
    pub created_at: i64,
    pub display_order: i64,
}

impl Activity {
    /// Activities of a category owned by `user_id`, in display order.
    pub fn find_by_category(conn: &Connection, category_id: i64, user_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT A.id, A.name, A.npom, A.category_id, A.createtime, A.vorder
             FROM activities A
             JOIN categories C ON A.category_id = C.id
             WHERE C.id = ?1 AND C.user_id = ?2
             ORDER BY A.vorder ASC"
        )?;

        let rows = stmt.query_map(params![category_id, user_id], |row| {
            Ok(Self {
                id: row.get(0)?,
                name: row.get(1)?,
                npom: row.get::<_, Option<i32>>(2)?.unwrap_or_default(),
                category_id: row.get(3)?,
                created_at: row.get(4)?,
                display_order: row.get(5)?,
            })
        })?;

        rows.collect()
    }

    /// Target count of an activity, if it belongs to `user_id`.
    pub fn find_target_owned(conn: &Connection, id: i64, user_id: i64) -> Result<Option<i32>> {
        conn.query_row(
            "SELECT A.npom
             FROM activities A
             JOIN categories C ON A.category_id = C.id
             WHERE A.id = ?1 AND C.user_id = ?2",
            params![id, user_id],
            |row| Ok(row.get::<_, Option<i32>>(0)?.unwrap_or_default()),
        )
        .optional()
    }

    /// Insert an activity at the end of the display order.
    ///
    /// The order value is `MAX(vorder) + 1` over the whole table, read and
    /// written by one statement inside an immediate transaction so two
    /// creates never share a value.
    pub fn create(
        conn: &mut Connection,
        category_id: i64,
        name: &str,
        npom: i32,
        created_at: i64,
    ) -> Result<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO activities (name, npom, createtime, category_id, vorder)
             VALUES (?1, ?2, ?3, ?4, (SELECT IFNULL(MAX(vorder), 0) FROM activities) + 1)",
            params![name, npom, created_at, category_id],
        )?;
        let id = tx.last_insert_rowid();
        let display_order: i64 = tx.query_row(
            "SELECT vorder FROM activities WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(Self {
            id,
            name: name.to_string(),
            npom,
            category_id,
            created_at,
            display_order,
        })
    }
}
