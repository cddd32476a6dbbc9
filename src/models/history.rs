use crate::calendar::WeekWindow;
use crate::constants::HISTORY_DAYS;
use crate::models::Activity;
use rusqlite::{Connection, Result, params};
use std::collections::BTreeMap;

/// Summed deltas per day, index 0 is six days ago and index 6 is today.
pub type WeekRow = [i64; HISTORY_DAYS];

/// Outcome of recording a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub activity_id: i64,
    /// Sum of today's deltas, including the one just recorded
    pub done_today: i64,
    /// Target minus `done_today`; negative once the target is exceeded
    pub remaining: i64,
    pub timestamp: i64,
}

/// Append a completion for an activity owned by `user_id` and total up the
/// current local day. `None` when the user owns no such activity.
pub fn record_completion(
    conn: &mut Connection,
    user_id: i64,
    activity_id: i64,
    delta: i32,
    now_ms: i64,
    today_start_ms: i64,
) -> Result<Option<Completion>> {
    let tx = conn.transaction()?;
    let Some(target) = Activity::find_target_owned(&tx, activity_id, user_id)? else {
        return Ok(None);
    };

    HistoryEntry::record(&tx, user_id, activity_id, delta, now_ms)?;
    let done_today = HistoryEntry::done_since(&tx, activity_id, today_start_ms)?;
    tx.commit()?;

    Ok(Some(Completion {
        activity_id,
        done_today,
        remaining: i64::from(target) - done_today,
        timestamp: now_ms,
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: i64,
    pub done: i32,
    pub activity_id: i64,
    pub user_id: i64,
}

impl HistoryEntry {
    /// Append a completion event.
    pub fn record(
        conn: &Connection,
        user_id: i64,
        activity_id: i64,
        done: i32,
        timestamp: i64,
    ) -> Result<Self> {
        conn.execute(
            "INSERT INTO history (tstamp, done, activity_id, user_id) VALUES (?1, ?2, ?3, ?4)",
            params![timestamp, done, activity_id, user_id],
        )?;
        Ok(Self {
            id: conn.last_insert_rowid(),
            timestamp,
            done,
            activity_id,
            user_id,
        })
    }

    /// Sum of deltas for an activity since `since_ms` (inclusive).
    pub fn done_since(conn: &Connection, activity_id: i64, since_ms: i64) -> Result<i64> {
        conn.query_row(
            "SELECT IFNULL(SUM(done), 0) FROM history WHERE activity_id = ?1 AND tstamp >= ?2",
            params![activity_id, since_ms],
            |row| row.get(0),
        )
    }

    /// Entries in a user's category within `[start_ms, end_ms]`.
    pub fn find_for_category(
        conn: &Connection,
        user_id: i64,
        category_id: i64,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT H.id, H.tstamp, H.done, H.activity_id, H.user_id
             FROM history H
             JOIN activities A ON H.activity_id = A.id
             JOIN categories C ON A.category_id = C.id
             WHERE C.user_id = ?1 AND C.id = ?2 AND H.tstamp >= ?3 AND H.tstamp <= ?4
             ORDER BY H.tstamp"
        )?;

        let rows = stmt.query_map(params![user_id, category_id, start_ms, end_ms], |row| {
            Ok(Self {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                done: row.get::<_, Option<i32>>(2)?.unwrap_or_default(),
                activity_id: row.get(3)?,
                user_id: row.get(4)?,
            })
        })?;

        rows.collect()
    }

    /// Per-activity day buckets for a category. Activities without entries
    /// in the window are left out.
    pub fn weekly_totals(
        conn: &Connection,
        user_id: i64,
        category_id: i64,
        window: &WeekWindow,
    ) -> Result<BTreeMap<i64, WeekRow>> {
        let entries =
            Self::find_for_category(conn, user_id, category_id, window.start_ms, window.end_ms)?;
        Ok(bucket_entries(&entries, window))
    }
}

fn bucket_entries(entries: &[HistoryEntry], window: &WeekWindow) -> BTreeMap<i64, WeekRow> {
    let mut totals: BTreeMap<i64, WeekRow> = BTreeMap::new();
    for entry in entries {
        let Some(day) = window.bucket(entry.timestamp) else {
            continue;
        };
        let row = totals.entry(entry.activity_id).or_insert([0; HISTORY_DAYS]);
        if let Some(slot) = row.get_mut(day) {
            *slot += i64::from(entry.done);
        }
    }
    totals
}
