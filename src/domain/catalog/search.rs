//! Catalog search criteria.

use super::TRANSLATION_CATEGORY;

/// Upper bound on a single search page.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    /// Stable id order.
    #[default]
    ById,
    /// Longest body text first; works without a body are excluded.
    LengthDesc,
}

impl SearchSort {
    /// Parses the `sort` query parameter. Unknown values use the default.
    pub fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some("length_desc") => SearchSort::LengthDesc,
            _ => SearchSort::ById,
        }
    }
}

/// What to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// Substring of title or author. Ascending id order by default.
    Keyword(String),
    /// Exact category. Newest works first by default.
    Category(String),
    /// Substring of the genre tag list.
    Genre(String),
}

/// Limit and offset of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Clamps the limit to `1..=MAX_PAGE_LIMIT`.
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            offset,
        }
    }
}

/// A complete search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub filter: SearchFilter,
    pub sort: SearchSort,
    pub page: Page,
}

impl SearchCriteria {
    /// Builds a keyword or translation search.
    ///
    /// `type=translation` browses the translated category and ignores the
    /// keyword. Otherwise a blank keyword yields None and the caller
    /// returns an empty list.
    pub fn keyword(query: Option<&str>, kind: Option<&str>, sort: SearchSort, page: Page) -> Option<Self> {
        let filter = if kind.is_some_and(|k| k.eq_ignore_ascii_case("translation")) {
            SearchFilter::Category(TRANSLATION_CATEGORY.to_string())
        } else {
            SearchFilter::Keyword(non_blank(query)?)
        };
        Some(Self { filter, sort, page })
    }

    /// Builds a genre search. A blank genre yields None.
    pub fn genre(genre: Option<&str>, sort: SearchSort, page: Page) -> Option<Self> {
        Some(Self {
            filter: SearchFilter::Genre(non_blank(genre)?),
            sort,
            page,
        })
    }
}

/// Trimmed input, or None if nothing is left.
pub fn non_blank(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::new(50, 0)
    }

    #[test]
    fn translation_type_browses_gutenberg() {
        let criteria = SearchCriteria::keyword(None, Some("TRANSLATION"), SearchSort::ById, page()).unwrap();
        assert_eq!(criteria.filter, SearchFilter::Category("Gutenberg".to_string()));
    }

    #[test]
    fn keyword_is_trimmed() {
        let criteria = SearchCriteria::keyword(Some("  夏目 "), None, SearchSort::ById, page()).unwrap();
        assert_eq!(criteria.filter, SearchFilter::Keyword("夏目".to_string()));
    }

    #[test]
    fn blank_keyword_yields_nothing() {
        assert!(SearchCriteria::keyword(Some("   "), None, SearchSort::ById, page()).is_none());
        assert!(SearchCriteria::keyword(None, Some("other"), SearchSort::ById, page()).is_none());
    }

    #[test]
    fn blank_genre_yields_nothing() {
        assert!(SearchCriteria::genre(Some(""), SearchSort::ById, page()).is_none());
    }

    #[test]
    fn sort_param_parsing() {
        assert_eq!(SearchSort::from_param(Some("length_desc")), SearchSort::LengthDesc);
        assert_eq!(SearchSort::from_param(Some("newest")), SearchSort::ById);
        assert_eq!(SearchSort::from_param(None), SearchSort::ById);
    }

    #[test]
    fn page_limit_is_clamped() {
        assert_eq!(Page::new(0, 5).limit, 1);
        assert_eq!(Page::new(10_000, 5).limit, MAX_PAGE_LIMIT);
        assert_eq!(Page::new(10_000, 5).offset, 5);
    }
}
