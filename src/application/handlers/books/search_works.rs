//! Catalog search handlers.

use std::sync::Arc;

use crate::domain::catalog::{non_blank, top_genre_tags, CatalogError, DisplayRecord, SearchCriteria};
use crate::ports::WorkRepository;

/// Keyword, category, and genre search. Criteria are built by the caller;
/// `None` means the request had nothing to match and yields no results.
pub struct SearchWorksHandler {
    works: Arc<dyn WorkRepository>,
}

impl SearchWorksHandler {
    pub fn new(works: Arc<dyn WorkRepository>) -> Self {
        Self { works }
    }

    pub async fn handle(
        &self,
        criteria: Option<SearchCriteria>,
        viewer_premium: bool,
    ) -> Result<Vec<DisplayRecord>, CatalogError> {
        let Some(criteria) = criteria else {
            return Ok(Vec::new());
        };
        let works = self.works.search(&criteria).await?;
        Ok(DisplayRecord::project_all(&works, viewer_premium))
    }
}

/// Title or author prefix completion.
pub struct SuggestWorksHandler {
    works: Arc<dyn WorkRepository>,
    limit: usize,
}

impl SuggestWorksHandler {
    pub fn new(works: Arc<dyn WorkRepository>, limit: usize) -> Self {
        Self { works, limit }
    }

    pub async fn handle(
        &self,
        prefix: Option<&str>,
        viewer_premium: bool,
    ) -> Result<Vec<DisplayRecord>, CatalogError> {
        let Some(prefix) = non_blank(prefix) else {
            return Ok(Vec::new());
        };
        let works = self.works.suggest(&prefix, self.limit).await?;
        Ok(DisplayRecord::project_all(&works, viewer_premium))
    }
}

/// Author names ordered by number of works.
pub struct ListAuthorsHandler {
    works: Arc<dyn WorkRepository>,
    top: usize,
}

impl ListAuthorsHandler {
    pub fn new(works: Arc<dyn WorkRepository>, top: usize) -> Self {
        Self { works, top }
    }

    /// `all` lifts the top-N cut.
    pub async fn handle(&self, all: bool) -> Result<Vec<String>, CatalogError> {
        let limit = if all { None } else { Some(self.top) };
        Ok(self.works.list_authors(limit).await?)
    }
}

/// Most common individual genre tags.
pub struct ListGenresHandler {
    works: Arc<dyn WorkRepository>,
    top: usize,
}

impl ListGenresHandler {
    pub fn new(works: Arc<dyn WorkRepository>, top: usize) -> Self {
        Self { works, top }
    }

    pub async fn handle(&self) -> Result<Vec<String>, CatalogError> {
        let tag_lists = self.works.list_genre_tags().await?;
        Ok(top_genre_tags(tag_lists, self.top))
    }
}
