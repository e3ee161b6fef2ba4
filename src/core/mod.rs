//! Core module - typed contract values and shared configuration

pub mod block;
pub mod config;
pub mod edit;
pub mod path;
pub mod template;

pub use block::{Block, BlockType, Props};
pub use config::Config;
pub use edit::EditResult;
pub use path::{FieldPath, PathSegment};
pub use template::{Template, TemplateType};
