//! Machine-readable output shapes and violation tables

use chrono::{DateTime, Utc};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;
use crate::core::FieldPath;
use crate::schema::{ContractKind, LintWarning, ValidationFailure};

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

/// One entry of a failure body
///
/// `path` is the segment array (`["blocks", 0, "id"]`), `pointer` the same
/// location as a JSON Pointer.
#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub path: FieldPath,
    pub pointer: String,
    pub kind: String,
    pub message: String,
}

/// Error body handed to HTTP callers for a rejected document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub errors: Vec<ErrorEntry>,
    pub timestamp: DateTime<Utc>,
}

impl FailureBody {
    pub fn from_failure(failure: &ValidationFailure) -> Self {
        Self {
            success: false,
            status_code: failure.status_code(),
            message: failure.to_string(),
            errors: failure
                .violations()
                .iter()
                .map(|v| ErrorEntry {
                    path: v.path.clone(),
                    pointer: v.path.to_json_pointer(),
                    kind: v.kind.to_string(),
                    message: v.message.clone(),
                })
                .collect(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-file record printed by `validate --format json`
#[derive(Debug, Serialize)]
pub struct FileRecord<'a> {
    pub path: String,
    pub contract: Option<ContractKind>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub violations: &'a [crate::schema::Violation],
    pub warnings: &'a [LintWarning],
}

/// A flattened row for tabular output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingRow {
    pub file: String,
    pub severity: &'static str,
    pub path: String,
    pub kind: String,
    pub message: String,
}

impl FindingRow {
    pub fn errors(file: &str, failure: &ValidationFailure) -> Vec<Self> {
        failure
            .violations()
            .iter()
            .map(|v| FindingRow {
                file: file.to_string(),
                severity: "error",
                path: v.path.to_string(),
                kind: v.kind.to_string(),
                message: v.message.clone(),
            })
            .collect()
    }

    pub fn warnings(file: &str, warnings: &[LintWarning], strict: bool) -> Vec<Self> {
        warnings
            .iter()
            .map(|w| FindingRow {
                file: file.to_string(),
                severity: if strict { "error" } else { "warning" },
                path: w.path.to_string(),
                kind: w.kind.as_str().to_string(),
                message: w.message.clone(),
            })
            .collect()
    }
}

const HEADERS: [&str; 5] = ["FILE", "SEVERITY", "PATH", "KIND", "MESSAGE"];

/// Render finding rows as CSV or a markdown table
pub fn render_rows(rows: &[FindingRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            {
                let mut writer = csv::Writer::from_writer(&mut buf);
                writer
                    .write_record(HEADERS.iter().map(|h| h.to_lowercase()))
                    .into_diagnostic()?;
                for row in rows {
                    writer
                        .write_record([
                            row.file.as_str(),
                            row.severity,
                            row.path.as_str(),
                            row.kind.as_str(),
                            row.message.as_str(),
                        ])
                        .into_diagnostic()?;
                }
                writer.flush().into_diagnostic()?;
            }
            String::from_utf8(buf).into_diagnostic()
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(HEADERS);
            for row in rows {
                builder.push_record([
                    row.file.as_str(),
                    row.severity,
                    row.path.as_str(),
                    row.kind.as_str(),
                    row.message.as_str(),
                ]);
            }
            Ok(builder.build().with(Style::markdown()).to_string())
        }
    }
}
