//! Template - an ordered list of blocks plus metadata describing one email design

use serde::{Deserialize, Serialize};

use crate::core::block::Block;

/// Template type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    #[default]
    Transactional,
    Marketing,
}

impl TemplateType {
    pub const NAMES: &'static [&'static str] = &["transactional", "marketing"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Transactional => "transactional",
            TemplateType::Marketing => "marketing",
        }
    }

    pub fn all() -> &'static [TemplateType] {
        &[TemplateType::Transactional, TemplateType::Marketing]
    }
}

impl std::fmt::Display for TemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transactional" => Ok(TemplateType::Transactional),
            "marketing" => Ok(TemplateType::Marketing),
            _ => Err(format!("Unknown template type: {}", s)),
        }
    }
}

/// A generated template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,

    pub category: String,

    #[serde(rename = "type", default)]
    pub template_type: TemplateType,

    pub blocks: Vec<Block>,

    /// Placeholder names referenced by the template
    #[serde(default)]
    pub variables: Vec<String>,
}

impl Template {
    pub fn block_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.id.as_str())
    }
}
