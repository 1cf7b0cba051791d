use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of characters that are not safe inside an S3 key segment
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-zA-Z!\-_.*'()]+").expect("sanitizer pattern is valid"));

/// Map a chapter title to a storage-key-safe identifier.
///
/// Every maximal run of disallowed characters becomes a single `_`, then
/// leading and trailing underscores are stripped. The mapping is not
/// injective: "CHAPTER 1: Start" and "CHAPTER 1 / Start" both become
/// "CHAPTER_1_Start".
pub fn sanitize_title(title: &str) -> String {
    DISALLOWED
        .replace_all(title, "_")
        .trim_matches('_')
        .to_string()
}
