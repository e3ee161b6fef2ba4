//! Input error diagnostics with source locations

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::input::loader::DocumentFormat;
use crate::input::locate::path_span;
use crate::schema::{LintWarning, ValidationFailure};

/// JSON or YAML syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{format} syntax error: {message}")]
#[diagnostic(code(tplcheck::input::syntax))]
pub struct SyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    format: DocumentFormat,

    /// The underlying error message
    message: String,
}

impl SyntaxError {
    pub fn from_json(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at_location(
            DocumentFormat::Json,
            err.to_string(),
            source,
            filename,
            err.line(),
            err.column(),
        )
    }

    pub fn from_yaml(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        Self::at_location(
            DocumentFormat::Yaml,
            err.to_string(),
            source,
            filename,
            line,
            column,
        )
    }

    pub fn at_location(
        format: DocumentFormat,
        message: impl Into<String>,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let message = message.into();
        let offset = line_col_to_offset(source, line, column);
        let help = generate_help(format, &message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            format,
            message,
        }
    }
}

/// Errors raised while reading an input document
#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(tplcheck::input::io))]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Unsupported file type: {path} (expected .json, .yaml or .yml)")]
    #[diagnostic(code(tplcheck::input::unsupported))]
    Unsupported { path: String },
}

/// A validation failure rendered against the document it came from
#[derive(Debug, Error, Diagnostic)]
#[error("{summary}")]
#[diagnostic(code(tplcheck::contract::rejected))]
pub struct SourceReport {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    findings: Vec<SourceFinding>,
}

/// One labelled violation or warning inside a [`SourceReport`]
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SourceFinding {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SourceReport {
    pub fn from_failure(failure: &ValidationFailure, source: &str, filename: &str) -> Self {
        let findings = failure
            .violations()
            .iter()
            .map(|v| SourceFinding {
                span: path_span(source, &v.path),
                message: v.to_string(),
                hint: v.kind.hint().to_string(),
                help: v.help.clone(),
            })
            .collect();

        Self {
            summary: failure.to_string(),
            src: NamedSource::new(filename, source.to_string()),
            findings,
        }
    }

    pub fn from_warnings(warnings: &[LintWarning], source: &str, filename: &str) -> Self {
        let findings = warnings
            .iter()
            .map(|w| SourceFinding {
                span: path_span(source, &w.path),
                message: w.to_string(),
                hint: "inconsistent".to_string(),
                help: None,
            })
            .collect();

        Self {
            summary: format!("{} consistency warning(s)", warnings.len()),
            src: NamedSource::new(filename, source.to_string()),
            findings,
        }
    }

    pub fn finding_count(&self) -> usize {
        self.findings.len()
    }
}

/// Convert 1-based line/column to a byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let col_bytes = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(b, _)| b)
                .unwrap_or(text.len());
            return (offset + col_bytes).min(source.len());
        }
        offset += text.len();
    }
    source.len()
}

/// Generate helpful suggestions based on the parser message
fn generate_help(format: DocumentFormat, message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    match format {
        DocumentFormat::Json => {
            if msg_lower.contains("trailing comma") {
                return Some("JSON does not allow a comma after the last element".to_string());
            }
            if msg_lower.contains("key must be a string") {
                return Some("Object keys must be double-quoted: {\"id\": \"...\"}".to_string());
            }
            if msg_lower.contains("eof while parsing") {
                return Some(
                    "The document ends early - the AI response may have been truncated".to_string(),
                );
            }
            if msg_lower.contains("expected value") {
                return Some(
                    "Strip any prose or markdown fences around the JSON payload".to_string(),
                );
            }
            None
        }
        DocumentFormat::Yaml => {
            if msg_lower.contains("tab") {
                return Some(
                    "YAML requires spaces for indentation, not tabs. Replace tabs with spaces."
                        .to_string(),
                );
            }
            if msg_lower.contains("duplicate key") {
                return Some(
                    "Each key can only appear once. Remove or rename the duplicate key.".to_string(),
                );
            }
            if msg_lower.contains("mapping values are not allowed") {
                return Some(
                    "You may be missing a space after ':' or have incorrect indentation."
                        .to_string(),
                );
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldPath;
    use crate::schema::{validate_template, ContractKind, Violation};

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 1), source.len());
    }

    #[test]
    fn test_source_report_has_one_finding_per_violation() {
        let source = r#"{"name": "x", "category": "y", "blocks": [{"type": "text"}, {"id": "b", "type": "gif"}]}"#;
        let value: serde_json::Value = serde_json::from_str(source).unwrap();
        let err = validate_template(&value).unwrap_err();
        let report = SourceReport::from_failure(err.failure().unwrap(), source, "t.template.json");
        assert_eq!(report.finding_count(), 2);
        assert!(report.to_string().contains("2 violations"));
    }

    #[test]
    fn test_findings_point_into_the_failing_block() {
        let source = "name: Welcome\ncategory: onboarding\nblocks:\n  - id: h1\n    type: header\n  - type: text\n  - id: b3\n    type: marquee\n";
        let value: serde_json::Value = serde_yml::from_str(source).unwrap();
        let err = validate_template(&value).unwrap_err();
        let report = SourceReport::from_failure(err.failure().unwrap(), source, "t.template.yaml");

        assert_eq!(report.finding_count(), 2);
        let missing = report.findings[0].span;
        assert_eq!(missing.offset(), source.find("type: text").unwrap());
        assert_eq!(missing.len(), "type: text".len());

        let bad_type = report.findings[1].span;
        assert_eq!(bad_type.offset(), source.find("type: marquee").unwrap());
        assert_eq!(bad_type.len(), "type".len());
    }

    #[test]
    fn test_unknown_key_falls_back_to_first_line() {
        let failure = ValidationFailure::new(
            ContractKind::Block,
            vec![Violation::missing(FieldPath::root().key("id"))],
        );
        let report = SourceReport::from_failure(&failure, "{}\n", "b.block.json");
        assert_eq!(report.findings[0].span.offset(), 0);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help(DocumentFormat::Json, "trailing comma at line 3").is_some());
        assert!(generate_help(DocumentFormat::Yaml, "found tab character").is_some());
        assert!(generate_help(DocumentFormat::Json, "some random error").is_none());
    }
}
