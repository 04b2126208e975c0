//! The quote record extracted from each page

/// Separator used when flattening tags into a single CSV field
pub const TAG_SEPARATOR: &str = ", ";

/// A single quote with its author and tags
///
/// Records are plain values: once built they are never modified. Tags keep
/// the order in which they appear on the page and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    text: String,
    author: String,
    tags: Vec<String>,
}

impl Record {
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Joins the tags into the single field stored in the CSV output
    pub fn joined_tags(&self) -> String {
        self.tags.join(TAG_SEPARATOR)
    }

    /// Splits a joined tag field back into individual tags
    ///
    /// An empty field means the record had no tags.
    pub fn split_tags(field: &str) -> Vec<String> {
        if field.is_empty() {
            return Vec::new();
        }
        field.split(TAG_SEPARATOR).map(str::to_string).collect()
    }
}
