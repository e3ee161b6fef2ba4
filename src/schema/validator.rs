//! Contract validation with exhaustive violation reporting
//!
//! Every operation is a pure function of its input: it walks the untyped
//! value once, collects every path-level violation it finds (never stopping
//! at the first), fills in documented defaults, drops keys the contract does
//! not name, and only then converts the normalized value to its typed form.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::{Block, EditResult, FieldPath, Template};
use crate::schema::registry::{ContractKind, FieldShape, FieldSpec, SchemaBody, BLOCK_FIELDS};
use crate::schema::violation::{ContractError, ValidationFailure, Violation};

/// How a generation suite reacts to its first failing template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuitePolicy {
    /// Validate every template and report all failures
    #[default]
    ReportAll,
    /// Stop after the first template that fails
    FailFast,
}

impl std::fmt::Display for SuitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuitePolicy::ReportAll => write!(f, "report-all"),
            SuitePolicy::FailFast => write!(f, "fail-fast"),
        }
    }
}

impl std::str::FromStr for SuitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "report-all" | "all" => Ok(SuitePolicy::ReportAll),
            "fail-fast" | "first" => Ok(SuitePolicy::FailFast),
            _ => Err(format!("Unknown suite policy: {}", s)),
        }
    }
}

/// A successfully validated value of any contract
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Block(Block),
    Template(Template),
    Suite(Vec<Template>),
    Edit(EditResult),
}

impl Normalized {
    pub fn kind(&self) -> ContractKind {
        match self {
            Normalized::Block(_) => ContractKind::Block,
            Normalized::Template(_) => ContractKind::Template,
            Normalized::Suite(_) => ContractKind::Suite,
            Normalized::Edit(_) => ContractKind::Edit,
        }
    }
}

/// Validate and normalize a single block
pub fn validate_block(input: &Value) -> Result<Block, ContractError> {
    check_object_contract(ContractKind::Block, input)
}

/// Validate and normalize a generated template
pub fn validate_template(input: &Value) -> Result<Template, ContractError> {
    check_object_contract(ContractKind::Template, input)
}

/// Validate and normalize an edit result.
///
/// The id sets are not cross-checked against `updatedBlocks`.
pub fn validate_edit_result(input: &Value) -> Result<EditResult, ContractError> {
    check_object_contract(ContractKind::Edit, input)
}

/// Validate a generation suite, reporting failures of every template
pub fn validate_suite(input: &Value) -> Result<Vec<Template>, ContractError> {
    validate_suite_with(input, SuitePolicy::ReportAll)
}

/// Validate a generation suite under the given policy.
///
/// Each template is checked independently; violation paths are prefixed with
/// the template's index. The suite is accepted only if every template is.
pub fn validate_suite_with(
    input: &Value,
    policy: SuitePolicy,
) -> Result<Vec<Template>, ContractError> {
    let kind = ContractKind::Suite;
    let item_kind = match kind.schema().body {
        SchemaBody::ListOf(item) => item,
        SchemaBody::Object(_) => ContractKind::Template,
    };

    let mut checker = Checker::default();
    let mut normalized = Vec::new();

    match input.as_array() {
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                let before = checker.violations.len();
                let path = FieldPath::root().index(i);
                let value = checker.object(item, item_kind.schema().fields(), &path);
                if checker.violations.len() > before {
                    if policy == SuitePolicy::FailFast {
                        break;
                    }
                    continue;
                }
                if let Some(value) = value {
                    normalized.push(value);
                }
            }
        }
        None => checker.push(Violation::invalid_type(FieldPath::root(), "an array")),
    }

    let templates = normalized
        .into_iter()
        .map(|value| into_typed::<Template>(item_kind, value));
    let result: Result<Vec<Template>, ContractError> =
        checker.finish(kind).and_then(|()| templates.collect());

    debug!(
        contract = %kind,
        %policy,
        ok = result.is_ok(),
        "suite validation finished"
    );
    result
}

/// Validate an input against the named contract
pub fn validate(kind: ContractKind, input: &Value) -> Result<Normalized, ContractError> {
    match kind {
        ContractKind::Block => validate_block(input).map(Normalized::Block),
        ContractKind::Template => validate_template(input).map(Normalized::Template),
        ContractKind::Suite => validate_suite(input).map(Normalized::Suite),
        ContractKind::Edit => validate_edit_result(input).map(Normalized::Edit),
    }
}

/// Same as [`validate`], with an explicit policy for suites
pub fn validate_with(
    kind: ContractKind,
    input: &Value,
    policy: SuitePolicy,
) -> Result<Normalized, ContractError> {
    match kind {
        ContractKind::Suite => validate_suite_with(input, policy).map(Normalized::Suite),
        _ => validate(kind, input),
    }
}

fn check_object_contract<T: DeserializeOwned>(
    kind: ContractKind,
    input: &Value,
) -> Result<T, ContractError> {
    let mut checker = Checker::default();
    let value = checker.object(input, kind.schema().fields(), &FieldPath::root());

    debug!(
        contract = %kind,
        violations = checker.violations.len(),
        "validation finished"
    );

    checker.finish(kind)?;
    match value {
        Some(value) => into_typed(kind, value),
        None => Err(ContractError::Internal {
            contract: kind,
            message: "no value produced for a passing input".to_string(),
        }),
    }
}

fn into_typed<T: DeserializeOwned>(kind: ContractKind, value: Value) -> Result<T, ContractError> {
    serde_json::from_value(value).map_err(|e| ContractError::Internal {
        contract: kind,
        message: e.to_string(),
    })
}

/// Collects violations while building the normalized value
#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    fn finish(self, kind: ContractKind) -> Result<(), ContractError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::new(kind, self.violations).into())
        }
    }

    /// Check an object against its fields. Returns the normalized object,
    /// containing only the named fields with defaults applied.
    fn object(&mut self, value: &Value, fields: &[FieldSpec], path: &FieldPath) -> Option<Value> {
        let Some(input) = value.as_object() else {
            self.push(Violation::invalid_type(path.clone(), "an object"));
            return None;
        };

        let mut normalized = Map::new();
        for spec in fields {
            let field_path = path.key(spec.name);
            let checked = match input.get(spec.name) {
                Some(field_value) => self.field(field_value, spec, &field_path),
                None => match spec.default_value() {
                    Some(default) => Some(default),
                    None => {
                        self.push(Violation::missing(field_path));
                        None
                    }
                },
            };
            if let Some(checked) = checked {
                normalized.insert(spec.name.to_string(), checked);
            }
        }

        Some(Value::Object(normalized))
    }

    fn field(&mut self, value: &Value, spec: &FieldSpec, path: &FieldPath) -> Option<Value> {
        match spec.shape {
            FieldShape::Text => self.text(value, path, |s| !s.is_empty()),
            FieldShape::Identifier => self.text(value, path, |s| !s.trim().is_empty()),
            FieldShape::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => Some(value.clone()),
                _ => {
                    self.push(Violation::invalid_enum(path.clone(), allowed));
                    None
                }
            },
            FieldShape::Map => {
                if value.is_object() {
                    Some(value.clone())
                } else {
                    self.push(Violation::invalid_type(path.clone(), "an object"));
                    None
                }
            }
            FieldShape::TextList => self.text_list(value, path),
            FieldShape::BlockList => self.block_list(value, path),
        }
    }

    fn text(
        &mut self,
        value: &Value,
        path: &FieldPath,
        present: impl Fn(&str) -> bool,
    ) -> Option<Value> {
        match value.as_str() {
            Some(s) if present(s) => Some(value.clone()),
            Some(_) => {
                self.push(Violation::missing(path.clone()));
                None
            }
            None => {
                self.push(Violation::invalid_type(path.clone(), "a string"));
                None
            }
        }
    }

    fn text_list(&mut self, value: &Value, path: &FieldPath) -> Option<Value> {
        let Some(items) = value.as_array() else {
            self.push(Violation::invalid_type(path.clone(), "an array"));
            return None;
        };

        let before = self.violations.len();
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.push(Violation::invalid_type(path.index(i), "a string"));
            }
        }

        (self.violations.len() == before).then(|| value.clone())
    }

    fn block_list(&mut self, value: &Value, path: &FieldPath) -> Option<Value> {
        let Some(items) = value.as_array() else {
            self.push(Violation::invalid_type(path.clone(), "an array"));
            return None;
        };

        if items.is_empty() {
            self.push(Violation::empty_collection(path.clone()));
            return None;
        }

        let before = self.violations.len();
        let blocks: Vec<Value> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.object(item, BLOCK_FIELDS, &path.index(i)))
            .collect();

        (self.violations.len() == before).then(|| Value::Array(blocks))
    }
}
