//! Change notifications emitted by the host.

use crate::Block;
use serde::{Deserialize, Serialize};

/// Kind of change the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A block's content was saved. The only kind the plugin acts on.
    BlockSaved,
    /// A block was inserted into the outline.
    BlockInserted,
    /// A block (and its descendants) was removed.
    BlockRemoved,
    /// A block was moved under a different parent or position.
    BlockMoved,
}

impl ChangeKind {
    /// Stable name used in the change log.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockSaved => "BlockSaved",
            Self::BlockInserted => "BlockInserted",
            Self::BlockRemoved => "BlockRemoved",
            Self::BlockMoved => "BlockMoved",
        }
    }
}

/// One change notification.
///
/// `blocks` holds the affected blocks as they were when the event fired; it
/// may be empty for hosts that only report kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub blocks: Vec<Block>,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(kind: ChangeKind, blocks: Vec<Block>) -> Self {
        Self { kind, blocks }
    }

    /// The block the plugin inspects: the first one in the payload.
    #[must_use]
    pub fn first_block(&self) -> Option<&Block> {
        self.blocks.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn block(id: &str) -> Block {
        Block {
            id: id.to_string(),
            content: String::new(),
            parent_id: None,
            properties: HashMap::new(),
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = ChangeEvent::new(ChangeKind::BlockSaved, vec![block("b-1")]);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"BlockSaved\""));

        let back: ChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_first_block() {
        let event = ChangeEvent::new(ChangeKind::BlockSaved, vec![block("b-1"), block("b-2")]);
        assert_eq!(event.first_block().map(|b| b.id.as_str()), Some("b-1"));
        assert!(ChangeEvent::new(ChangeKind::BlockMoved, vec![]).first_block().is_none());
    }
}
