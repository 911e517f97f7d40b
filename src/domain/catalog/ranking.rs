//! Ordering helpers for ranked listings.

use std::collections::HashMap;

use crate::domain::foundation::WorkId;

use super::Work;

/// Reorders hydrated works to follow `ids`.
///
/// Bulk lookups return rows in storage order, so rankings and history
/// lists must be re-sorted. Ids without a matching work are skipped and
/// a work appears once per occurrence of its id.
pub fn order_by_ids(ids: &[WorkId], works: Vec<Work>) -> Vec<Work> {
    let by_id: HashMap<WorkId, Work> = works.into_iter().map(|w| (w.id, w)).collect();
    ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
}

/// Ranks individual genre tags across comma-joined tag strings.
///
/// Tags are trimmed and blanks dropped. Higher counts come first and
/// equal counts are ordered by tag.
pub fn top_genre_tags<I>(tag_lists: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for list in tag_lists {
        for tag in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            *counts.entry(tag.to_string()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|(a_tag, a_count), (b_tag, b_count)| {
        b_count.cmp(a_count).then_with(|| a_tag.cmp(b_tag))
    });
    ranked.into_iter().take(limit).map(|(tag, _)| tag).collect()
}
