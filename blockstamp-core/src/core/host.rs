//! The editing surface the plugin drives.

use crate::{Block, PluginSettings, PropertyValue, Result};

/// Editing API provided by the host application.
///
/// Every call completes before the plugin moves on to the next block, and any
/// error is handed straight back to the plugin's caller.
pub trait Host {
    /// Reads a block. `Ok(None)` means the ID does not resolve.
    fn get_block(&self, block_id: &str) -> Result<Option<Block>>;

    /// The currently selected blocks, or `None` when nothing is selected.
    fn selected_blocks(&self) -> Result<Option<Vec<Block>>>;

    /// The block whose content is being edited, if any.
    fn editing_block(&self) -> Result<Option<Block>>;

    /// Replaces a block's content.
    ///
    /// # Errors
    ///
    /// Implementations return [`crate::BlockstampError::BlockNotFound`] when
    /// the ID no longer resolves.
    fn update_block(&mut self, block_id: &str, content: &str) -> Result<()>;

    /// Sets one property on a block.
    fn set_block_property(&mut self, block_id: &str, key: &str, value: PropertyValue)
        -> Result<()>;

    /// Current plugin settings; `None` until the host has loaded them.
    fn settings(&self) -> Option<PluginSettings>;
}
