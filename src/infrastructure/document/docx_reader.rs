use super::{DocumentError, DocumentReader};
use docx_rust::document::{BodyContent, Paragraph, ParagraphContent, Run, RunContent};
use docx_rust::DocxFile;
use std::path::Path;

/// Word manuscripts. Only top-level body paragraphs are read; tables and
/// other block content are skipped.
pub struct DocxDocumentReader;

impl DocumentReader for DocxDocumentReader {
    fn paragraphs(&self, path: &Path) -> Result<Vec<String>, DocumentError> {
        let file = DocxFile::from_file(path).map_err(|e| DocumentError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let docx = file.parse().map_err(|e| DocumentError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let paragraphs: Vec<String> = docx
            .document
            .body
            .content
            .iter()
            .filter_map(|content| match content {
                BodyContent::Paragraph(para) => Some(paragraph_text(para)),
                _ => None,
            })
            .collect();

        tracing::debug!(
            path = %path.display(),
            paragraph_count = paragraphs.len(),
            "Document paragraphs read"
        );

        Ok(paragraphs)
    }
}

/// Visible text of a paragraph, hyperlink text included
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();

    for content in &para.content {
        match content {
            ParagraphContent::Run(run) => push_run_text(run, &mut text),
            ParagraphContent::Link(link) => {
                if let Some(run) = &link.content {
                    push_run_text(run, &mut text);
                }
            }
            _ => {}
        }
    }

    text
}

fn push_run_text(run: &Run, text: &mut String) {
    for rc in &run.content {
        match rc {
            RunContent::Text(t) => text.push_str(&t.text),
            RunContent::Break(_) => text.push('\n'),
            RunContent::Tab(_) => text.push('\t'),
            _ => {}
        }
    }
}
