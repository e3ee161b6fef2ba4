//! CLI command implementations

pub mod completions;
pub mod config;
pub mod normalize;
pub mod schema;
pub mod validate;
