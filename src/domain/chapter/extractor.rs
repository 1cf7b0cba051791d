use indexmap::IndexMap;

/// Paragraphs starting with this literal open a new chapter
pub const CHAPTER_MARKER: &str = "CHAPTER";

/// Group document paragraphs into chapters keyed by their trimmed title.
///
/// The body of each chapter starts with the raw title paragraph and gets every
/// following paragraph appended with a single space, up to the next boundary.
/// Paragraphs before the first boundary are dropped. A title seen twice keeps
/// its first position and the second occurrence is appended to the same body,
/// so nothing read before the repeat is lost. This differs from resetting the
/// body to the repeated title paragraph, which would discard the earlier text.
pub fn extract_chapters<I, S>(paragraphs: I) -> IndexMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut chapters: IndexMap<String, String> = IndexMap::new();
    let mut current: Option<String> = None;
    let mut dropped = 0usize;

    for paragraph in paragraphs {
        let text = paragraph.as_ref();

        if text.starts_with(CHAPTER_MARKER) {
            let title = text.trim().to_string();

            if let Some(body) = chapters.get_mut(&title) {
                tracing::warn!(
                    title = %title,
                    "Duplicate chapter title, merging into the existing chapter"
                );
                body.push(' ');
                body.push_str(text);
            } else {
                chapters.insert(title.clone(), text.to_string());
            }

            current = Some(title);
            continue;
        }

        match current.as_ref().and_then(|title| chapters.get_mut(title)) {
            Some(body) => {
                body.push(' ');
                body.push_str(text);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(
            dropped_paragraphs = dropped,
            "Paragraphs before the first chapter were skipped"
        );
    }

    chapters
}
