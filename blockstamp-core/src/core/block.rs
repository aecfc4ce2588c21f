use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Property key that flags a block as an auto-stamp template.
pub const TEMPLATE_PROPERTY: &str = "timestamp-template";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl PropertyValue {
    /// Interprets the value as a flag. Hosts that store properties as text
    /// write `"true"`, so both spellings count.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            Self::Number(n) => *n != 0.0,
        }
    }
}

/// A single outline node as seen by the plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub properties: HashMap<String, PropertyValue>,
}

impl Block {
    /// Returns `true` when this block's children should be stamped on save.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.properties
            .get(TEMPLATE_PROPERTY)
            .is_some_and(PropertyValue::is_truthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(properties: HashMap<String, PropertyValue>) -> Block {
        Block {
            id: "block-1".to_string(),
            content: "Daily log".to_string(),
            parent_id: None,
            properties,
        }
    }

    #[test]
    fn test_plain_block_is_not_template() {
        assert!(!block(HashMap::new()).is_template());
    }

    #[test]
    fn test_boolean_template_property() {
        let mut props = HashMap::new();
        props.insert(TEMPLATE_PROPERTY.to_string(), PropertyValue::Boolean(true));
        assert!(block(props).is_template());
    }

    #[test]
    fn test_text_template_property() {
        let mut props = HashMap::new();
        props.insert(TEMPLATE_PROPERTY.to_string(), PropertyValue::Text("True".to_string()));
        assert!(block(props.clone()).is_template());

        props.insert(TEMPLATE_PROPERTY.to_string(), PropertyValue::Text("no".to_string()));
        assert!(!block(props).is_template());
    }
}
