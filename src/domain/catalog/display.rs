//! Projection of a work into the client-facing record.

use serde::Serialize;

use crate::domain::foundation::WorkId;

use super::Work;

/// Placeholder text left behind by a broken import.
const CORRUPT_MARKER: &str = "[object Object]";

const DEFAULT_CATEGORY: &str = "AOZORA";

/// What clients render for a work.
///
/// Built only through [`DisplayRecord::project`], which is a pure
/// function of the work and the viewer's premium flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: WorkId,
    pub title: String,
    pub author_name: String,
    pub image_url: Option<String>,
    pub aozora_url: Option<String>,
    pub summary_text: Option<String>,
    pub catchphrase: Option<String>,
    pub insight: Option<String>,
    pub high_quality: bool,
    pub locked: bool,
    pub genre_tag: Option<String>,
    pub category: String,
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}

impl DisplayRecord {
    /// Chooses the summary variant and lock state for a viewer.
    ///
    /// | translated | has HQ | premium | summary                  | locked | badge  |
    /// |------------|--------|---------|--------------------------|--------|--------|
    /// | yes        | any    | any     | long, short, hq (first)  | no     | has HQ |
    /// | no         | no     | any     | standard                 | no     | no     |
    /// | no         | yes    | yes     | hq                       | no     | yes    |
    /// | no         | yes    | no      | standard                 | yes    | no     |
    pub fn project(work: &Work, viewer_premium: bool) -> Self {
        let (summary_text, locked, high_quality) = if work.is_translated() {
            let summary = [&work.summary_long, &work.summary_short, &work.summary_hq]
                .into_iter()
                .filter_map(|text| clean(text))
                .find(|text| !text.is_empty());
            (summary, false, work.has_hq)
        } else if !work.has_hq {
            (clean(&work.summary_standard), false, false)
        } else if viewer_premium {
            (clean(&work.summary_hq), false, true)
        } else {
            (clean(&work.summary_standard), true, false)
        };

        Self {
            id: work.id,
            title: work.title.clone().unwrap_or_default(),
            author_name: work.author.clone().unwrap_or_default(),
            image_url: work.image_url.clone(),
            aozora_url: work.source_url.clone(),
            summary_text,
            catchphrase: clean(&work.catchphrase),
            insight: clean(&work.insight),
            high_quality,
            locked,
            genre_tag: clean(&work.genre_tags),
            category: work
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            original_title: clean(&work.original_title),
            body_text: None,
        }
    }

    /// Attaches the full text. Only the detail path does this.
    pub fn with_body(mut self, work: &Work) -> Self {
        self.body_text = work.body_text.clone();
        self
    }

    /// Projects a list for one viewer, keeping order.
    pub fn project_all(works: &[Work], viewer_premium: bool) -> Vec<Self> {
        works
            .iter()
            .map(|work| Self::project(work, viewer_premium))
            .collect()
    }
}

fn clean(text: &Option<String>) -> Option<String> {
    text.as_ref()
        .filter(|t| !t.contains(CORRUPT_MARKER))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn domestic(has_hq: bool) -> Work {
        Work {
            id: WorkId::new(42),
            title: Some("羅生門".to_string()),
            author: Some("芥川竜之介".to_string()),
            category: Some("AOZORA".to_string()),
            summary_standard: Some("standard summary".to_string()),
            summary_hq: Some("hq summary".to_string()),
            has_hq,
            body_text: Some("body".to_string()),
            ..Default::default()
        }
    }

    fn translated() -> Work {
        Work {
            id: WorkId::new(7),
            category: Some("Gutenberg".to_string()),
            summary_short: Some("short".to_string()),
            summary_hq: Some("hq".to_string()),
            summary_long: Some(String::new()),
            has_hq: true,
            ..Default::default()
        }
    }

    #[test]
    fn free_viewer_of_hq_work_is_locked_to_standard() {
        let record = DisplayRecord::project(&domestic(true), false);
        assert_eq!(record.summary_text.as_deref(), Some("standard summary"));
        assert!(record.locked);
        assert!(!record.high_quality);
    }

    #[test]
    fn premium_viewer_of_hq_work_gets_hq() {
        let record = DisplayRecord::project(&domestic(true), true);
        assert_eq!(record.summary_text.as_deref(), Some("hq summary"));
        assert!(!record.locked);
        assert!(record.high_quality);
    }

    #[test]
    fn work_without_hq_shows_standard_to_everyone() {
        for premium in [false, true] {
            let record = DisplayRecord::project(&domestic(false), premium);
            assert_eq!(record.summary_text.as_deref(), Some("standard summary"));
            assert!(!record.locked);
            assert!(!record.high_quality);
        }
    }

    #[test]
    fn translated_work_takes_first_non_empty_summary() {
        let record = DisplayRecord::project(&translated(), false);
        assert_eq!(record.summary_text.as_deref(), Some("short"));
        assert!(!record.locked);
        assert!(record.high_quality);
    }

    #[test]
    fn translated_work_falls_back_to_hq() {
        let work = Work {
            summary_short: None,
            ..translated()
        };
        let record = DisplayRecord::project(&work, false);
        assert_eq!(record.summary_text.as_deref(), Some("hq"));
    }

    #[test]
    fn corrupt_text_is_dropped() {
        let work = Work {
            catchphrase: Some("[object Object]".to_string()),
            insight: Some("fine".to_string()),
            ..domestic(false)
        };
        let record = DisplayRecord::project(&work, false);
        assert!(record.catchphrase.is_none());
        assert_eq!(record.insight.as_deref(), Some("fine"));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let record = DisplayRecord::project(&Work::default(), false);
        assert_eq!(record.title, "");
        assert_eq!(record.author_name, "");
        assert_eq!(record.category, "AOZORA");
    }

    #[test]
    fn body_only_on_detail() {
        let work = domestic(false);
        assert!(DisplayRecord::project(&work, true).body_text.is_none());
        let detail = DisplayRecord::project(&work, true).with_body(&work);
        assert_eq!(detail.body_text.as_deref(), Some("body"));
    }

    #[test]
    fn serializes_camel_case_without_absent_body() {
        let json = serde_json::to_value(DisplayRecord::project(&domestic(true), false)).unwrap();
        assert_eq!(json["authorName"], "芥川竜之介");
        assert_eq!(json["locked"], true);
        assert!(json.get("bodyText").is_none());
    }

    proptest! {
        #[test]
        fn free_projection_never_leaks_hq(
            hq in "[a-z]{1,20}",
            standard in "[A-Z]{1,20}",
            has_hq in any::<bool>(),
            translated_flag in any::<bool>(),
        ) {
            let work = Work {
                category: Some(if translated_flag { "Gutenberg" } else { "AOZORA" }.to_string()),
                summary_hq: Some(format!("HQ-{}", hq)),
                summary_standard: Some(standard),
                has_hq,
                ..Default::default()
            };
            let record = DisplayRecord::project(&work, false);
            if !translated_flag {
                prop_assert!(record.summary_text.as_deref().map_or(true, |s| !s.starts_with("HQ-")));
                prop_assert_eq!(record.locked, has_hq);
            }
        }

        #[test]
        fn projection_is_deterministic(has_hq in any::<bool>(), premium in any::<bool>()) {
            let work = domestic(has_hq);
            prop_assert_eq!(
                DisplayRecord::project(&work, premium),
                DisplayRecord::project(&work, premium)
            );
        }
    }
}
