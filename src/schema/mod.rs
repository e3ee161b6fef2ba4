//! Schema system - contract definitions, validation and consistency checks

pub mod export;
pub mod lint;
pub mod registry;
pub mod validator;
pub mod violation;

pub use export::json_schema;
pub use lint::{lint, LintKind, LintWarning};
pub use registry::{ContractKind, ContractSchema, FieldShape, FieldSpec};
pub use validator::{
    validate, validate_block, validate_edit_result, validate_suite, validate_suite_with,
    validate_template, validate_with, Normalized, SuitePolicy,
};
pub use violation::{ContractError, ValidationFailure, Violation, ViolationKind};
