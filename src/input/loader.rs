//! Document loading utilities
//!
//! Reads JSON or YAML documents into untyped values, keeping the source text
//! around so failures can be reported against it.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::input::diagnostics::{InputError, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "JSON"),
            DocumentFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// A parsed input document
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub source: String,
    pub value: Value,
}

impl Document {
    /// File name used in diagnostics
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Parse document text in the given format
pub fn parse_document(
    source: &str,
    filename: &str,
    format: DocumentFormat,
) -> Result<Value, InputError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(source)
            .map_err(|e| SyntaxError::from_json(&e, source, filename).into()),
        DocumentFormat::Yaml => serde_yml::from_str(source)
            .map_err(|e| SyntaxError::from_yaml(&e, source, filename).into()),
    }
}

/// Read and parse a single document
pub fn load_document(path: &Path) -> Result<Document, InputError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| InputError::Unsupported {
        path: path.display().to_string(),
    })?;
    let source = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let value = parse_document(&source, &filename, format)?;
    debug!(path = %path.display(), %format, "loaded document");

    Ok(Document {
        path: path.to_path_buf(),
        format,
        source,
        value,
    })
}

/// Expand the given paths into document files.
///
/// Directories are walked recursively, skipping hidden entries and files
/// without a JSON or YAML extension. Plain file arguments are kept as-is so
/// unsupported files surface as errors instead of being silently dropped.
pub fn collect_documents(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| DocumentFormat::from_path(p).is_some())
            .collect();
        found.sort();
        files.extend(found);
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.JSON")), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_parse_yaml_document() {
        let value = parse_document(
            "id: h1\ntype: header\n",
            "h1.block.yaml",
            DocumentFormat::Yaml,
        )
        .unwrap();
        assert_eq!(value, serde_json::json!({"id": "h1", "type": "header"}));
    }

    #[test]
    fn test_parse_json_syntax_error() {
        let err = parse_document("{\"id\": }", "b.json", DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, InputError::Syntax(_)));
        assert!(err.to_string().contains("JSON syntax error"));
    }

    #[test]
    fn test_load_document_missing_file() {
        let err = load_document(Path::new("/nonexistent/t.template.json")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }

    #[test]
    fn test_load_document_unsupported_extension() {
        let err = load_document(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, InputError::Unsupported { .. }));
    }

    #[test]
    fn test_collect_documents_walks_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("templates");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(dir.path().join(".cache")).unwrap();
        fs::write(nested.join("b.json"), "{}").unwrap();
        fs::write(nested.join("a.yaml"), "{}").unwrap();
        fs::write(nested.join("notes.md"), "").unwrap();
        fs::write(dir.path().join(".cache").join("c.json"), "{}").unwrap();

        let files = collect_documents(&[dir.path().to_path_buf()]);
        assert_eq!(files, vec![nested.join("a.yaml"), nested.join("b.json")]);
    }

    #[test]
    fn test_load_document_keeps_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edit.json");
        fs::write(&path, "{\"summary\": \"x\"}").unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.format, DocumentFormat::Json);
        assert_eq!(doc.source, "{\"summary\": \"x\"}");
        assert_eq!(doc.name(), "edit.json");
    }
}
