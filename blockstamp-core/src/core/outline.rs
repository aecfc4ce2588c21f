//! A SQLite-backed outline that implements [`Host`].
//!
//! `OutlineStore` stands in for an editor: it owns a block tree, tracks the
//! selection and the block being edited, keeps the plugin settings, and
//! queues a [`ChangeEvent`] for every mutation. Writes made by the plugin go
//! through the same path as user edits, so they show up in the feed too.

use crate::core::change_log::ChangeLog;
use crate::{
    Block, BlockstampError, ChangeEvent, ChangeKind, Host, PluginSettings, PropertyValue, Result,
    Storage,
};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Pending events kept before the oldest are dropped.
const FEED_CAPACITY: usize = 1000;

const META_SELECTION: &str = "selection";
const META_EDITING: &str = "editing_block_id";
const META_SETTINGS: &str = "plugin_settings";

/// An outline document stored in SQLite.
pub struct OutlineStore {
    storage: Storage,
    change_log: ChangeLog,
}

impl OutlineStore {
    /// Creates a new outline database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::Database`] for any SQLite failure.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_storage(Storage::create(path)?))
    }

    /// Opens an existing outline database.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::InvalidStore`] if the file lacks the
    /// outline tables, or [`BlockstampError::Database`] for SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_storage(Storage::open(path)?))
    }

    /// Creates a throwaway outline held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::Database`] for any SQLite failure.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_storage(Storage::open_in_memory()?))
    }

    fn from_storage(storage: Storage) -> Self {
        Self {
            storage,
            change_log: ChangeLog::new(FEED_CAPACITY),
        }
    }

    pub fn connection(&self) -> &Connection {
        self.storage.connection()
    }

    /// Fetches a single block.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::BlockNotFound`] for unknown IDs.
    pub fn block(&self, block_id: &str) -> Result<Block> {
        self.find_block(block_id)?
            .ok_or_else(|| BlockstampError::BlockNotFound(block_id.to_string()))
    }

    fn find_block(&self, block_id: &str) -> Result<Option<Block>> {
        find_block_in(self.connection(), block_id)
    }

    /// Appends a block as the last child of `parent_id`, or as a root block.
    /// Returns the new block's ID.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::BlockNotFound`] if `parent_id` is unknown.
    pub fn insert_block(&mut self, parent_id: Option<&str>, content: &str) -> Result<String> {
        if let Some(pid) = parent_id {
            self.block(pid)?;
        }

        let block = Block {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            parent_id: parent_id.map(str::to_string),
            properties: HashMap::new(),
        };
        let now = chrono::Utc::now().timestamp();

        let tx = self.storage.connection_mut().transaction()?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM blocks WHERE parent_id IS ?1",
            [&block.parent_id],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO blocks (id, parent_id, position, content, properties_json, created_at, modified_at)
             VALUES (?, ?, ?, ?, '{}', ?, ?)",
            rusqlite::params![block.id, block.parent_id, position, block.content, now, now],
        )?;

        self.change_log
            .log(&tx, &ChangeEvent::new(ChangeKind::BlockInserted, vec![block.clone()]))?;
        self.change_log.purge_if_needed(&tx)?;
        tx.commit()?;

        Ok(block.id)
    }

    /// Replaces a block's content as a user edit would, queuing `BlockSaved`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::BlockNotFound`] if `block_id` is unknown.
    pub fn save_block(&mut self, block_id: &str, content: &str) -> Result<Block> {
        let now = chrono::Utc::now().timestamp();
        let tx = self.storage.connection_mut().transaction()?;

        tx.execute(
            "UPDATE blocks SET content = ?1, modified_at = ?2 WHERE id = ?3",
            rusqlite::params![content, now, block_id],
        )?;
        // UPDATE on a missing row succeeds with zero changes.
        if tx.changes() == 0 {
            return Err(BlockstampError::BlockNotFound(block_id.to_string()));
        }

        let block = find_block_in(&tx, block_id)?
            .ok_or_else(|| BlockstampError::BlockNotFound(block_id.to_string()))?;
        self.change_log
            .log(&tx, &ChangeEvent::new(ChangeKind::BlockSaved, vec![block.clone()]))?;
        self.change_log.purge_if_needed(&tx)?;
        tx.commit()?;
        Ok(block)
    }

    /// Returns the children of `parent_id` in outline order.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::Database`] if the query fails.
    pub fn get_children(&self, parent_id: &str) -> Result<Vec<Block>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, parent_id, content, properties_json FROM blocks
             WHERE parent_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map([parent_id], map_block_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(block_from_row).collect()
    }

    /// Moves a block to the end of `new_parent_id`'s children (or to the root).
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::BlockNotFound`] for unknown IDs and
    /// [`BlockstampError::InvalidMove`] if the move would put a block inside itself.
    pub fn move_block(&mut self, block_id: &str, new_parent_id: Option<&str>) -> Result<()> {
        self.block(block_id)?;
        if let Some(pid) = new_parent_id {
            let mut cursor = Some(self.block(pid)?);
            while let Some(ancestor) = cursor {
                if ancestor.id == block_id {
                    return Err(BlockstampError::InvalidMove(format!(
                        "cannot move block {block_id} under its own descendant"
                    )));
                }
                cursor = match ancestor.parent_id {
                    Some(ref id) => self.find_block(id)?,
                    None => None,
                };
            }
        }

        let now = chrono::Utc::now().timestamp();
        let tx = self.storage.connection_mut().transaction()?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM blocks WHERE parent_id IS ?1",
            [new_parent_id],
            |row| row.get(0),
        )?;
        tx.execute(
            "UPDATE blocks SET parent_id = ?1, position = ?2, modified_at = ?3 WHERE id = ?4",
            rusqlite::params![new_parent_id, position, now, block_id],
        )?;

        let block = find_block_in(&tx, block_id)?
            .ok_or_else(|| BlockstampError::BlockNotFound(block_id.to_string()))?;
        self.change_log
            .log(&tx, &ChangeEvent::new(ChangeKind::BlockMoved, vec![block]))?;
        self.change_log.purge_if_needed(&tx)?;
        tx.commit()?;
        Ok(())
    }

    /// Deletes `block_id` and all of its descendants. Returns the number of
    /// blocks removed.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::BlockNotFound`] if `block_id` is unknown.
    pub fn delete_block(&mut self, block_id: &str) -> Result<usize> {
        let block = self.block(block_id)?;

        let tx = self.storage.connection_mut().transaction()?;
        let removed = Self::delete_recursive_in_tx(&tx, block_id)?;
        self.change_log
            .log(&tx, &ChangeEvent::new(ChangeKind::BlockRemoved, vec![block]))?;
        self.change_log.purge_if_needed(&tx)?;
        tx.commit()?;

        Ok(removed)
    }

    /// Deletes children before their parent; the caller owns the transaction.
    fn delete_recursive_in_tx(tx: &rusqlite::Transaction, block_id: &str) -> Result<usize> {
        let child_ids: Vec<String> = {
            let mut stmt = tx.prepare("SELECT id FROM blocks WHERE parent_id = ?1")?;
            let ids = stmt
                .query_map([block_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            ids
        };

        let mut removed = 0;
        for child_id in child_ids {
            removed += Self::delete_recursive_in_tx(tx, &child_id)?;
        }
        removed += tx.execute("DELETE FROM blocks WHERE id = ?1", [block_id])?;
        Ok(removed)
    }

    /// Replaces the selection. An empty slice clears it.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::Database`] for any SQLite failure.
    pub fn set_selection(&mut self, block_ids: &[String]) -> Result<()> {
        if block_ids.is_empty() {
            return self.set_meta(META_SELECTION, None);
        }
        let json = serde_json::to_string(block_ids)?;
        self.set_meta(META_SELECTION, Some(&json))
    }

    /// Sets or clears the block being edited.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::Database`] for any SQLite failure.
    pub fn set_editing(&mut self, block_id: Option<&str>) -> Result<()> {
        self.set_meta(META_EDITING, block_id)
    }

    /// Stores the plugin settings the [`Host`] implementation hands out.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::Database`] or [`BlockstampError::Json`].
    pub fn set_settings(&mut self, settings: &PluginSettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.set_meta(META_SETTINGS, Some(&json))
    }

    /// Removes and returns pending change events, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::Database`] or [`BlockstampError::Json`].
    pub fn take_events(&mut self) -> Result<Vec<ChangeEvent>> {
        self.change_log.take(self.storage.connection_mut())
    }

    fn set_meta(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        let tx = self.storage.connection_mut().transaction()?;
        tx.execute("DELETE FROM store_meta WHERE key = ?1", [key])?;
        if let Some(value) = value {
            tx.execute(
                "INSERT INTO store_meta (key, value) VALUES (?1, ?2)",
                [key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let result = self.connection().query_row(
            "SELECT value FROM store_meta WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Host for OutlineStore {
    fn get_block(&self, block_id: &str) -> Result<Option<Block>> {
        self.find_block(block_id)
    }

    fn selected_blocks(&self) -> Result<Option<Vec<Block>>> {
        let Some(json) = self.get_meta(META_SELECTION)? else {
            return Ok(None);
        };
        let ids: Vec<String> = serde_json::from_str(&json)?;
        let mut blocks = Vec::with_capacity(ids.len());
        for id in &ids {
            // Selected blocks deleted since selection are skipped.
            if let Some(block) = self.find_block(id)? {
                blocks.push(block);
            }
        }
        Ok(Some(blocks))
    }

    fn editing_block(&self) -> Result<Option<Block>> {
        match self.get_meta(META_EDITING)? {
            Some(id) => self.find_block(&id),
            None => Ok(None),
        }
    }

    fn update_block(&mut self, block_id: &str, content: &str) -> Result<()> {
        self.save_block(block_id, content).map(|_| ())
    }

    fn set_block_property(
        &mut self,
        block_id: &str,
        key: &str,
        value: PropertyValue,
    ) -> Result<()> {
        let mut block = self.block(block_id)?;
        block.properties.insert(key.to_string(), value);
        let properties_json = serde_json::to_string(&block.properties)?;
        let now = chrono::Utc::now().timestamp();

        let tx = self.storage.connection_mut().transaction()?;
        tx.execute(
            "UPDATE blocks SET properties_json = ?1, modified_at = ?2 WHERE id = ?3",
            rusqlite::params![properties_json, now, block_id],
        )?;
        self.change_log
            .log(&tx, &ChangeEvent::new(ChangeKind::BlockSaved, vec![block]))?;
        self.change_log.purge_if_needed(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn settings(&self) -> Option<PluginSettings> {
        match self.get_meta(META_SETTINGS) {
            Ok(Some(json)) => serde_json::from_str(&json)
                .map_err(|e| log::warn!("stored plugin settings are unreadable: {e}"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("could not read plugin settings: {e}");
                None
            }
        }
    }
}

/// Raw `(id, parent_id, content, properties_json)` row.
type BlockRow = (String, Option<String>, String, String);

fn find_block_in(conn: &Connection, block_id: &str) -> Result<Option<Block>> {
    let result = conn.query_row(
        "SELECT id, parent_id, content, properties_json FROM blocks WHERE id = ?1",
        [block_id],
        map_block_row,
    );
    match result {
        Ok(row) => Ok(Some(block_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn map_block_row(row: &rusqlite::Row) -> rusqlite::Result<BlockRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, Option<String>>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
    ))
}

fn block_from_row((id, parent_id, content, properties_json): BlockRow) -> Result<Block> {
    Ok(Block {
        id,
        parent_id,
        content,
        properties: serde_json::from_str(&properties_json)?,
    })
}
