//! Template block - a single typed content unit

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rendering payload of a block. Its shape depends on the block type and is
/// passed through untouched.
pub type Props = Map<String, Value>;

/// Block type - closed set of content units a template can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Header,
    Text,
    Button,
    Image,
    Divider,
    Footer,
    Spacer,
    Columns,
}

impl BlockType {
    /// Wire names of every block type, in declaration order
    pub const NAMES: &'static [&'static str] = &[
        "header", "text", "button", "image", "divider", "footer", "spacer", "columns",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::Text => "text",
            BlockType::Button => "button",
            BlockType::Image => "image",
            BlockType::Divider => "divider",
            BlockType::Footer => "footer",
            BlockType::Spacer => "spacer",
            BlockType::Columns => "columns",
        }
    }

    pub fn all() -> &'static [BlockType] {
        &[
            BlockType::Header,
            BlockType::Text,
            BlockType::Button,
            BlockType::Image,
            BlockType::Divider,
            BlockType::Footer,
            BlockType::Spacer,
            BlockType::Columns,
        ]
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BlockType {
    type Err = String;

    /// Exact, case-sensitive match against the wire names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::all()
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown block type: {}", s))
    }
}

/// A block inside a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Identifier, unique within its template
    pub id: String,

    #[serde(rename = "type")]
    pub block_type: BlockType,

    #[serde(default)]
    pub props: Props,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            props: Props::new(),
        }
    }

    /// Builder-style helper to attach a single prop
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}
