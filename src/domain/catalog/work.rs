//! Catalog work record.

use crate::domain::foundation::WorkId;

/// Categories whose works are translations rather than domestic texts.
const TRANSLATED_CATEGORIES: [&str; 2] = ["Gutenberg", "TRANSLATION"];

/// Category used when searching for translated works.
pub const TRANSLATION_CATEGORY: &str = "Gutenberg";

/// A literary work as stored in the catalog. Read-only.
///
/// Text columns are nullable in storage and stay optional here; the
/// projector decides how absent values are presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Work {
    pub id: WorkId,
    pub title: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub category: Option<String>,
    pub summary_short: Option<String>,
    pub summary_standard: Option<String>,
    pub summary_hq: Option<String>,
    pub summary_long: Option<String>,
    pub catchphrase: Option<String>,
    pub insight: Option<String>,
    /// Comma-joined genre tags.
    pub genre_tags: Option<String>,
    pub has_hq: bool,
    pub original_title: Option<String>,
    pub body_text: Option<String>,
}

impl Work {
    /// Whether the category marks this work as a translation.
    pub fn is_translated(&self) -> bool {
        self.category.as_deref().is_some_and(|category| {
            TRANSLATED_CATEGORIES
                .iter()
                .any(|t| t.eq_ignore_ascii_case(category))
        })
    }

    /// Title for denormalized history and favorites rows.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Author for denormalized history and favorites rows.
    pub fn author_or_empty(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }
}
