//! Validation failures with per-field violations

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::FieldPath;
use crate::schema::registry::ContractKind;

/// Category of a single violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent (or an empty string where text is required)
    MissingField,
    /// Value has the wrong shape, e.g. `props` is an array
    InvalidType,
    /// Value is not in the allowed closed set
    InvalidEnum,
    /// Required array is present but empty
    EmptyCollection,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "missing_field",
            ViolationKind::InvalidType => "invalid_type",
            ViolationKind::InvalidEnum => "invalid_enum",
            ViolationKind::EmptyCollection => "empty_collection",
        }
    }

    /// Short label for source annotations
    pub fn hint(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "required field missing",
            ViolationKind::InvalidType => "wrong type",
            ViolationKind::InvalidEnum => "invalid value",
            ViolationKind::EmptyCollection => "empty list",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single path-level violation
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
#[error("{path}: {message}")]
#[diagnostic(code(contract::violation))]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub message: String,

    #[help]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Violation {
    pub fn missing(path: FieldPath) -> Self {
        let help = path
            .last_key()
            .map(|key| format!("Add the '{}' field", key));
        Self {
            path,
            kind: ViolationKind::MissingField,
            message: "required".to_string(),
            help,
        }
    }

    pub fn invalid_type(path: FieldPath, expected: &str) -> Self {
        Self {
            path,
            kind: ViolationKind::InvalidType,
            message: format!("must be {}", expected),
            help: None,
        }
    }

    pub fn invalid_enum(path: FieldPath, allowed: &[&str]) -> Self {
        Self {
            path,
            kind: ViolationKind::InvalidEnum,
            message: "not one of the allowed values".to_string(),
            help: Some(format!("Valid values: {}", allowed.join(", "))),
        }
    }

    pub fn empty_collection(path: FieldPath) -> Self {
        Self {
            path,
            kind: ViolationKind::EmptyCollection,
            message: "must contain at least 1 element".to_string(),
            help: None,
        }
    }
}

/// Every violation found while checking one input against a contract
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
#[error("{contract} failed validation: {}", count_label(.violations.len()))]
#[diagnostic(
    code(contract::validation_failed),
    help("The input was rejected as a whole; fix every listed field and retry")
)]
pub struct ValidationFailure {
    pub contract: ContractKind,

    #[related]
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(contract: ContractKind, violations: Vec<Violation>) -> Self {
        Self {
            contract,
            violations,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// HTTP status callers should answer with (Unprocessable Entity)
    pub fn status_code(&self) -> u16 {
        422
    }
}

/// Error returned by every validation operation
#[derive(Debug, Error, Diagnostic)]
pub enum ContractError {
    /// The input does not satisfy the contract
    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] ValidationFailure),

    /// A checked value could not be converted to its typed form. Indicates a
    /// bug in the schema definitions, never a problem with the input.
    #[error("internal fault while normalizing {contract}: {message}")]
    #[diagnostic(code(contract::internal))]
    Internal {
        contract: ContractKind,
        message: String,
    },
}

impl ContractError {
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            ContractError::Invalid(failure) => Some(failure),
            ContractError::Internal { .. } => None,
        }
    }

    pub fn into_failure(self) -> Option<ValidationFailure> {
        match self {
            ContractError::Invalid(failure) => Some(failure),
            ContractError::Internal { .. } => None,
        }
    }
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 violation".to_string()
    } else {
        format!("{} violations", count)
    }
}
