//! Sender contract: validation of AI-generated email template content
//!
//! Checks untrusted generation and edit output against the block, template,
//! generation-suite and edit-result contracts, fills in documented defaults,
//! and reports every violation with its field path.

pub mod cli;
pub mod core;
pub mod input;
pub mod schema;

pub use crate::core::{Block, BlockType, EditResult, FieldPath, Template, TemplateType};
pub use crate::schema::{
    validate_block, validate_edit_result, validate_suite, validate_template, ContractError,
    ContractKind, ValidationFailure, Violation, ViolationKind,
};
