use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::catalog::{SearchCriteria, SearchFilter, SearchSort, Work};
use crate::domain::foundation::{DomainError, WorkId};
use crate::ports::WorkRepository;

/// A fixed catalog. Matching is case-insensitive.
#[derive(Debug, Default)]
pub struct InMemoryWorkRepository {
    works: Vec<Work>,
}

impl InMemoryWorkRepository {
    pub fn with_works(works: impl IntoIterator<Item = Work>) -> Self {
        let mut works: Vec<Work> = works.into_iter().collect();
        works.sort_by_key(|w| w.id);
        Self { works }
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn starts_with_ci(haystack: Option<&str>, prefix: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().starts_with(&prefix.to_lowercase()))
}

#[async_trait]
impl WorkRepository for InMemoryWorkRepository {
    async fn find_by_id(&self, id: WorkId) -> Result<Option<Work>, DomainError> {
        Ok(self.works.iter().find(|w| w.id == id).cloned())
    }

    async fn find_all_by_ids(&self, ids: &[WorkId]) -> Result<Vec<Work>, DomainError> {
        Ok(self
            .works
            .iter()
            .filter(|w| ids.contains(&w.id))
            .cloned()
            .collect())
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Work>, DomainError> {
        let mut hits: Vec<Work> = self
            .works
            .iter()
            .filter(|w| match &criteria.filter {
                SearchFilter::Keyword(q) => {
                    contains_ci(w.title.as_deref(), q) || contains_ci(w.author.as_deref(), q)
                }
                SearchFilter::Category(c) => {
                    w.category.as_deref().is_some_and(|cat| cat.eq_ignore_ascii_case(c))
                }
                SearchFilter::Genre(g) => contains_ci(w.genre_tags.as_deref(), g),
            })
            .cloned()
            .collect();

        match criteria.sort {
            SearchSort::LengthDesc => {
                hits.retain(|w| w.body_text.is_some());
                hits.sort_by(|a, b| {
                    let len = |w: &Work| w.body_text.as_deref().map_or(0, |t| t.chars().count());
                    len(b).cmp(&len(a)).then(a.id.cmp(&b.id))
                });
            }
            SearchSort::ById => {
                if matches!(criteria.filter, SearchFilter::Category(_)) {
                    hits.reverse();
                }
            }
        }

        Ok(hits
            .into_iter()
            .skip(criteria.page.offset)
            .take(criteria.page.limit)
            .collect())
    }

    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Work>, DomainError> {
        Ok(self
            .works
            .iter()
            .filter(|w| {
                starts_with_ci(w.title.as_deref(), prefix)
                    || starts_with_ci(w.author.as_deref(), prefix)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_authors(&self, limit: Option<usize>) -> Result<Vec<String>, DomainError> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for author in self.works.iter().filter_map(|w| w.author.as_deref()) {
            *counts.entry(author).or_default() += 1;
        }
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        Ok(ranked
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(author, _)| author.to_string())
            .collect())
    }

    async fn list_genre_tags(&self) -> Result<Vec<String>, DomainError> {
        Ok(self
            .works
            .iter()
            .filter_map(|w| w.genre_tags.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Page;

    fn work(id: i32, title: &str, author: &str, body: Option<&str>) -> Work {
        Work {
            id: WorkId::new(id),
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            body_text: body.map(str::to_string),
            ..Default::default()
        }
    }

    fn repo() -> InMemoryWorkRepository {
        InMemoryWorkRepository::with_works(vec![
            work(3, "羅生門", "芥川龍之介", Some("ある日の暮方の事である。")),
            work(1, "鼻", "芥川龍之介", None),
            work(2, "こころ", "夏目漱石", Some("私はその人を常に先生と呼んでいた。長い本文")),
        ])
    }

    fn ids(works: &[Work]) -> Vec<i32> {
        works.iter().map(|w| w.id.as_i32()).collect()
    }

    #[tokio::test]
    async fn keyword_matches_author_in_id_order() {
        let criteria = SearchCriteria {
            filter: SearchFilter::Keyword("芥川".to_string()),
            sort: SearchSort::ById,
            page: Page::new(50, 0),
        };

        assert_eq!(ids(&repo().search(&criteria).await.unwrap()), vec![1, 3]);
    }

    #[tokio::test]
    async fn length_sort_drops_bodyless_works() {
        let criteria = SearchCriteria {
            filter: SearchFilter::Keyword("".to_string()),
            sort: SearchSort::LengthDesc,
            page: Page::new(50, 0),
        };

        assert_eq!(ids(&repo().search(&criteria).await.unwrap()), vec![2, 3]);
    }

    #[tokio::test]
    async fn authors_ranked_by_work_count() {
        let authors = repo().list_authors(Some(1)).await.unwrap();
        assert_eq!(authors, vec!["芥川龍之介".to_string()]);
    }
}
