//! Input documents - loading, syntax errors and source-located reports

pub mod diagnostics;
pub mod loader;
mod locate;

pub use diagnostics::{InputError, SourceReport, SyntaxError};
pub use loader::{collect_documents, load_document, parse_document, Document, DocumentFormat};
