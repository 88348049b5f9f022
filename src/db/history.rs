use crate::error::HistoryError;
use crate::models::HistoryRecord;
use rusqlite::{params, Connection};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: u64,
    pub user_id: String,
    pub created_at: u64,
    pub record: HistoryRecord,
}

/// Seconds since the Unix epoch, the unit of `created_at`.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn insert_record(
    conn: &Connection,
    user_id: &str,
    record: &HistoryRecord,
) -> Result<u64, HistoryError> {
    insert_record_at(conn, user_id, record, unix_now())
}

fn insert_record_at(
    conn: &Connection,
    user_id: &str,
    record: &HistoryRecord,
    created_at: u64,
) -> Result<u64, HistoryError> {
    let payload = serde_json::to_string(record)?;
    conn.execute(
        "INSERT INTO history (user_id, record_type, subject, payload, created_at)
         VALUES (?, ?, ?, ?, ?)",
        params![
            user_id,
            record.kind(),
            record.subject().as_str(),
            payload,
            created_at
        ],
    )?;
    Ok(conn.last_insert_rowid() as u64)
}

/// All records for `user_id`, oldest insert first.
pub fn load_records(conn: &Connection, user_id: &str) -> Result<Vec<StoredRecord>, HistoryError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, payload, created_at FROM history WHERE user_id = ? ORDER BY id",
    )?;

    let rows = stmt.query_map([user_id], |row| {
        Ok((
            row.get::<_, u64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, u64>(3)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, user_id, payload, created_at) = row?;
        match serde_json::from_str::<HistoryRecord>(&payload) {
            Ok(record) => records.push(StoredRecord {
                id,
                user_id,
                created_at,
                record,
            }),
            Err(e) => tracing::warn!(id, error = %e, "skipping unreadable history row"),
        }
    }

    Ok(records)
}
