pub mod extractor;
pub mod sanitizer;

pub use extractor::{extract_chapters, CHAPTER_MARKER};
pub use sanitizer::sanitize_title;

/// A chapter ready for narration
///
/// `index` is the chapter's position in the document, so two chapters that
/// share a title stay distinguishable in reports even though they share a
/// storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub index: usize,
    pub title: String,
    pub body: String,
}

impl Chapter {
    /// Storage-key-safe form of the title
    pub fn sanitized_title(&self) -> String {
        sanitize_title(&self.title)
    }
}
