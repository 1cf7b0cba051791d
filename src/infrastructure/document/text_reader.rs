use super::{DocumentError, DocumentReader};
use std::path::Path;

/// Plain-text manuscripts, one paragraph per line
pub struct TextDocumentReader;

impl DocumentReader for TextDocumentReader {
    fn paragraphs(&self, path: &Path) -> Result<Vec<String>, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(content.lines().map(str::to_string).collect())
    }
}
