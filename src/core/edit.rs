//! Edit result - the outcome of an AI edit applied to an existing template

use serde::{Deserialize, Serialize};

use crate::core::block::Block;

/// Post-edit state of every touched block plus the changed/added/removed
/// partition of block ids.
///
/// The id sets are not checked against `updated_blocks`; see
/// [`crate::schema::lint`] for the advisory consistency checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub updated_blocks: Vec<Block>,

    #[serde(default)]
    pub changed_block_ids: Vec<String>,

    #[serde(default)]
    pub added_block_ids: Vec<String>,

    #[serde(default)]
    pub removed_block_ids: Vec<String>,

    /// Human-readable description of the change
    pub summary: String,
}

impl EditResult {
    pub fn updated_block(&self, id: &str) -> Option<&Block> {
        self.updated_blocks.iter().find(|b| b.id == id)
    }

    /// True when the edit reports no changed, added or removed ids
    pub fn is_noop(&self) -> bool {
        self.changed_block_ids.is_empty()
            && self.added_block_ids.is_empty()
            && self.removed_block_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::BlockType;

    #[test]
    fn test_camel_case_wire_names() {
        let edit = EditResult {
            updated_blocks: vec![Block::new("b1", BlockType::Text)],
            changed_block_ids: vec!["b1".to_string()],
            added_block_ids: vec![],
            removed_block_ids: vec![],
            summary: "Shortened intro".to_string(),
        };
        let json = serde_json::to_value(&edit).unwrap();
        assert!(json.get("updatedBlocks").is_some());
        assert!(json.get("changedBlockIds").is_some());
        assert!(json.get("removedBlockIds").is_some());
        assert!(!edit.is_noop());
        assert!(edit.updated_block("b1").is_some());
    }
}
