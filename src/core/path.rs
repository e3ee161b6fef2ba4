//! Field paths into untyped contract documents

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a field path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location of a value inside a document, e.g. `blocks[1].type`
///
/// Serializes as a plain array of keys and indices (`["blocks", 1, "type"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, pointing at the document itself
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend this path with an object key
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Extend this path with an array index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The last object key on the path, skipping trailing indices
    pub fn last_key(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// Render as an RFC 6901 JSON Pointer (`/blocks/1/type`)
    pub fn to_json_pointer(&self) -> String {
        self.0
            .iter()
            .map(|segment| match segment {
                PathSegment::Key(key) => format!("/{}", key.replace('~', "~0").replace('/', "~1")),
                PathSegment::Index(index) => format!("/{}", index),
            })
            .collect()
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested_path() {
        let path = FieldPath::root().key("blocks").index(1).key("type");
        assert_eq!(path.to_string(), "blocks[1].type");
    }

    #[test]
    fn test_display_leading_index() {
        let path = FieldPath::root().index(2).key("name");
        assert_eq!(path.to_string(), "[2].name");
    }

    #[test]
    fn test_display_root() {
        assert_eq!(FieldPath::root().to_string(), "<root>");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn test_serializes_as_mixed_array() {
        let path = FieldPath::root().key("blocks").index(0).key("id");
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["blocks", 0, "id"]));
    }

    #[test]
    fn test_deserializes_from_mixed_array() {
        let path: FieldPath = serde_json::from_value(serde_json::json!(["variables", 3])).unwrap();
        assert_eq!(path, FieldPath::root().key("variables").index(3));
    }

    #[test]
    fn test_json_pointer_escapes() {
        let path = FieldPath::root().key("props").key("a/b~c");
        assert_eq!(path.to_json_pointer(), "/props/a~1b~0c");
    }

    #[test]
    fn test_last_key_skips_indices() {
        let path: FieldPath = ["updatedBlocks"].into_iter().collect::<FieldPath>().index(4);
        assert_eq!(path.last_key(), Some("updatedBlocks"));
        assert_eq!(FieldPath::root().index(0).last_key(), None);
    }
}
