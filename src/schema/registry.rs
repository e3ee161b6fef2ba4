//! Contract schemas - the one definition of each contract shape
//!
//! Each contract is described once, as data. The validator interprets these
//! definitions to check and normalize input, `schema show` prints them, and
//! [`crate::schema::export`] turns them into JSON Schema documents. Field
//! descriptions are metadata only and never change what is accepted.

use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::{BlockType, TemplateType};

/// The contracts an AI response can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    /// A single template block
    Block,
    /// A generated template
    Template,
    /// A generation suite (array of templates)
    Suite,
    /// An edit result
    Edit,
}

impl ContractKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::Block => "block",
            ContractKind::Template => "template",
            ContractKind::Suite => "suite",
            ContractKind::Edit => "edit",
        }
    }

    pub fn all() -> &'static [ContractKind] {
        &[
            ContractKind::Block,
            ContractKind::Template,
            ContractKind::Suite,
            ContractKind::Edit,
        ]
    }

    /// Detect the contract from a file name such as `welcome.template.json`
    /// or `suite.yaml`
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        let stem = ["json", "yaml", "yml"]
            .iter()
            .find_map(|ext| lower.strip_suffix(&format!(".{}", ext)))?;

        Self::all().iter().copied().find(|kind| {
            let name = kind.as_str();
            stem == name || stem.ends_with(&format!(".{}", name))
        })
    }

    /// Detect the contract from a path, falling back to the parent directory
    /// name (`edits/`, `templates/`, ...)
    pub fn from_path(path: &Path) -> Option<Self> {
        if let Some(kind) = path
            .file_name()
            .and_then(|name| Self::from_filename(&name.to_string_lossy()))
        {
            return Some(kind);
        }

        let parent = path.parent()?.file_name()?.to_string_lossy().to_lowercase();
        Self::all().iter().copied().find(|kind| {
            let name = kind.as_str();
            parent == name || parent == format!("{}s", name)
        })
    }

    pub fn schema(&self) -> &'static ContractSchema {
        match self {
            ContractKind::Block => &BLOCK_SCHEMA,
            ContractKind::Template => &TEMPLATE_SCHEMA,
            ContractKind::Suite => &SUITE_SCHEMA,
            ContractKind::Edit => &EDIT_SCHEMA,
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContractKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "block" => Ok(ContractKind::Block),
            "template" | "generation" => Ok(ContractKind::Template),
            "suite" | "generation-suite" => Ok(ContractKind::Suite),
            "edit" => Ok(ContractKind::Edit),
            _ => Err(format!(
                "Unknown contract: {} (expected block, template, suite or edit)",
                s
            )),
        }
    }
}

/// Shape a field value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Non-empty string
    Text,
    /// String that is non-empty after trimming
    Identifier,
    /// String drawn from a closed set (exact match)
    OneOf(&'static [&'static str]),
    /// String-keyed object with opaque values
    Map,
    /// Array of strings
    TextList,
    /// Non-empty array of blocks
    BlockList,
}

impl FieldShape {
    /// Short type label used in field tables
    pub fn label(&self) -> &'static str {
        match self {
            FieldShape::Text | FieldShape::Identifier => "string",
            FieldShape::OneOf(_) => "enum",
            FieldShape::Map => "object",
            FieldShape::TextList => "string[]",
            FieldShape::BlockList => "block[]",
        }
    }
}

/// Value filled in when an optional field is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    EmptyMap,
    EmptyList,
    Text(&'static str),
}

impl DefaultValue {
    pub fn to_value(&self) -> Value {
        match self {
            DefaultValue::EmptyMap => json!({}),
            DefaultValue::EmptyList => json!([]),
            DefaultValue::Text(text) => Value::String((*text).to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional(DefaultValue),
}

/// One field of an object contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: FieldShape,
    pub presence: Presence,
    pub description: &'static str,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub fn default_value(&self) -> Option<Value> {
        match self.presence {
            Presence::Required => None,
            Presence::Optional(default) => Some(default.to_value()),
        }
    }
}

/// Body of a contract: an object with fields, or a list of another contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaBody {
    Object(&'static [FieldSpec]),
    ListOf(ContractKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractSchema {
    pub kind: ContractKind,
    pub title: &'static str,
    pub description: &'static str,
    pub body: SchemaBody,
}

impl ContractSchema {
    /// Fields of an object contract (empty for list contracts)
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self.body {
            SchemaBody::Object(fields) => fields,
            SchemaBody::ListOf(_) => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }
}

pub const BLOCK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "id",
        shape: FieldShape::Identifier,
        presence: Presence::Required,
        description: "Unique block identifier within the template",
    },
    FieldSpec {
        name: "type",
        shape: FieldShape::OneOf(BlockType::NAMES),
        presence: Presence::Required,
        description: "Block type",
    },
    FieldSpec {
        name: "props",
        shape: FieldShape::Map,
        presence: Presence::Optional(DefaultValue::EmptyMap),
        description: "Block-specific rendering properties",
    },
];

pub const TEMPLATE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        shape: FieldShape::Text,
        presence: Presence::Required,
        description: "Template name",
    },
    FieldSpec {
        name: "category",
        shape: FieldShape::Text,
        presence: Presence::Required,
        description: "Template category (e.g. onboarding, billing)",
    },
    FieldSpec {
        name: "type",
        shape: FieldShape::OneOf(TemplateType::NAMES),
        presence: Presence::Optional(DefaultValue::Text("transactional")),
        description: "Whether the email is transactional or marketing",
    },
    FieldSpec {
        name: "blocks",
        shape: FieldShape::BlockList,
        presence: Presence::Required,
        description: "Ordered content blocks",
    },
    FieldSpec {
        name: "variables",
        shape: FieldShape::TextList,
        presence: Presence::Optional(DefaultValue::EmptyList),
        description: "Placeholder names referenced by the template",
    },
];

pub const EDIT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "updatedBlocks",
        shape: FieldShape::BlockList,
        presence: Presence::Required,
        description: "Full post-edit state of every touched block",
    },
    FieldSpec {
        name: "changedBlockIds",
        shape: FieldShape::TextList,
        presence: Presence::Optional(DefaultValue::EmptyList),
        description: "Ids of blocks whose content changed",
    },
    FieldSpec {
        name: "addedBlockIds",
        shape: FieldShape::TextList,
        presence: Presence::Optional(DefaultValue::EmptyList),
        description: "Ids of newly added blocks",
    },
    FieldSpec {
        name: "removedBlockIds",
        shape: FieldShape::TextList,
        presence: Presence::Optional(DefaultValue::EmptyList),
        description: "Ids of removed blocks",
    },
    FieldSpec {
        name: "summary",
        shape: FieldShape::Text,
        presence: Presence::Required,
        description: "Human-readable description of the change",
    },
];

pub static BLOCK_SCHEMA: ContractSchema = ContractSchema {
    kind: ContractKind::Block,
    title: "Template Block",
    description: "A single typed content unit within an email template",
    body: SchemaBody::Object(BLOCK_FIELDS),
};

pub static TEMPLATE_SCHEMA: ContractSchema = ContractSchema {
    kind: ContractKind::Template,
    title: "Generated Template",
    description: "An email design produced by the generation service",
    body: SchemaBody::Object(TEMPLATE_FIELDS),
};

pub static SUITE_SCHEMA: ContractSchema = ContractSchema {
    kind: ContractKind::Suite,
    title: "Generation Suite",
    description: "A batch of generated templates, each validated independently",
    body: SchemaBody::ListOf(ContractKind::Template),
};

pub static EDIT_SCHEMA: ContractSchema = ContractSchema {
    kind: ContractKind::Edit,
    title: "Edit Result",
    description: "Blocks touched by an AI edit plus the changed/added/removed id partition",
    body: SchemaBody::Object(EDIT_FIELDS),
};
