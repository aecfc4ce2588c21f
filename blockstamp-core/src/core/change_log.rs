//! Durable change-notification feed for the outline store.

use crate::{ChangeEvent, Result};
use rusqlite::{Connection, Transaction};
use uuid::Uuid;

/// Records change events to the `change_events` table and hands them out in
/// order.
pub struct ChangeLog {
    keep_last: usize,
}

impl ChangeLog {
    /// Creates a log that retains at most `keep_last` pending events.
    pub fn new(keep_last: usize) -> Self {
        Self { keep_last }
    }

    /// Serialises `event` and appends it within `tx`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlockstampError::Database`] if the INSERT fails, or
    /// [`crate::BlockstampError::Json`] if `event` cannot be serialised.
    pub fn log(&self, tx: &Transaction, event: &ChangeEvent) -> Result<()> {
        let event_json = serde_json::to_string(event)?;

        tx.execute(
            "INSERT INTO change_events (event_id, timestamp, kind, event_data)
             VALUES (?, ?, ?, ?)",
            rusqlite::params![
                Uuid::new_v4().to_string(),
                chrono::Utc::now().timestamp(),
                event.kind.as_str(),
                event_json,
            ],
        )?;

        Ok(())
    }

    /// Drops the oldest events beyond `keep_last`. Call after every
    /// [`log`](Self::log).
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlockstampError::Database`] if the DELETE fails.
    pub fn purge_if_needed(&self, tx: &Transaction) -> Result<()> {
        let dropped = tx.execute(
            "DELETE FROM change_events WHERE id NOT IN (
                SELECT id FROM change_events ORDER BY id DESC LIMIT ?
            )",
            [self.keep_last as i64],
        )?;
        if dropped > 0 {
            log::warn!("change feed full, dropped {dropped} unread events");
        }
        Ok(())
    }

    /// Removes and returns every pending event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlockstampError::Database`] for any SQLite failure, or
    /// [`crate::BlockstampError::Json`] if a stored event is corrupt.
    pub fn take(&self, conn: &mut Connection) -> Result<Vec<ChangeEvent>> {
        let tx = conn.transaction()?;
        let rows: Vec<String> = {
            let mut stmt = tx.prepare("SELECT event_data FROM change_events ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        tx.execute("DELETE FROM change_events", [])?;
        tx.commit()?;

        rows.iter()
            .map(|json| Ok(serde_json::from_str(json)?))
            .collect()
    }
}
