pub mod document_loader;

pub use document_loader::{load_markdown, load_quiz_document, scan_input_folder, SourceKind};
