pub mod docx_reader;
pub mod text_reader;

pub use docx_reader::DocxDocumentReader;
pub use text_reader::TextDocumentReader;

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("could not open {path}: {message}")]
    Open { path: String, message: String },
    #[error("could not parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Produces the ordered paragraph texts of a manuscript
pub trait DocumentReader: Send + Sync {
    fn paragraphs(&self, path: &Path) -> Result<Vec<String>, DocumentError>;
}

/// Pick a reader from the file extension: `.txt` and `.md` are read as one
/// paragraph per line, anything else as a Word document.
pub fn reader_for_path(path: &Path) -> Box<dyn DocumentReader> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") | Some("md") => Box::new(TextDocumentReader),
        _ => Box::new(DocxDocumentReader),
    }
}
