//! Freemium and listing limits

use chrono::{Duration, FixedOffset};
use serde::Deserialize;

use super::error::ValidationError;
use super::payment::is_http_url;

const MAX_DEDUP_WINDOW_SECS: u64 = 86_400;

/// Tunables for the view quota and catalog listings.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Detail views a free user may open per day
    #[serde(default = "default_daily_free_views")]
    pub daily_free_views: u64,

    /// Repeat views of the same work inside this window count once
    #[serde(default = "default_dedup_window")]
    pub dedup_window_secs: u64,

    /// UTC offset, in hours, at which "today" starts
    #[serde(default = "default_day_boundary")]
    pub day_boundary_utc_offset_hours: i32,

    #[serde(default = "default_ten")]
    pub recent_history: usize,

    #[serde(default = "default_ten")]
    pub ranking_size: usize,

    #[serde(default = "default_search_page")]
    pub search_page: usize,

    #[serde(default = "default_ten")]
    pub suggest: usize,

    #[serde(default = "default_top_authors")]
    pub top_authors: usize,

    #[serde(default = "default_top_genres")]
    pub top_genres: usize,

    /// Where quota-exceeded bot users are sent to link or upgrade
    #[serde(default = "default_upsell_url")]
    pub upsell_url: String,
}

impl LimitsConfig {
    /// Window inside which repeat views collapse. At most one day.
    pub fn dedup_window(&self) -> Result<Duration, ValidationError> {
        if !(1..=MAX_DEDUP_WINDOW_SECS).contains(&self.dedup_window_secs) {
            return Err(ValidationError::InvalidDedupWindow);
        }
        i64::try_from(self.dedup_window_secs)
            .map(Duration::seconds)
            .map_err(|_| ValidationError::InvalidDedupWindow)
    }

    /// Offset used to compute the start of "today".
    pub fn day_boundary(&self) -> Result<FixedOffset, ValidationError> {
        if !(-12..=14).contains(&self.day_boundary_utc_offset_hours) {
            return Err(ValidationError::InvalidDayBoundary);
        }
        FixedOffset::east_opt(self.day_boundary_utc_offset_hours * 3600)
            .ok_or(ValidationError::InvalidDayBoundary)
    }

    /// Validate limit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.daily_free_views == 0 {
            return Err(ValidationError::NonPositiveLimit("daily_free_views"));
        }
        let listings = [
            ("recent_history", self.recent_history),
            ("ranking_size", self.ranking_size),
            ("search_page", self.search_page),
            ("suggest", self.suggest),
            ("top_authors", self.top_authors),
            ("top_genres", self.top_genres),
        ];
        if let Some((name, _)) = listings.iter().find(|(_, value)| *value == 0) {
            return Err(ValidationError::NonPositiveLimit(*name));
        }
        self.dedup_window()?;
        self.day_boundary()?;
        if !is_http_url(&self.upsell_url) {
            return Err(ValidationError::InvalidUrl("upsell_url"));
        }
        Ok(())
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            daily_free_views: default_daily_free_views(),
            dedup_window_secs: default_dedup_window(),
            day_boundary_utc_offset_hours: default_day_boundary(),
            recent_history: default_ten(),
            ranking_size: default_ten(),
            search_page: default_search_page(),
            suggest: default_ten(),
            top_authors: default_top_authors(),
            top_genres: default_top_genres(),
            upsell_url: default_upsell_url(),
        }
    }
}

fn default_daily_free_views() -> u64 {
    10
}

fn default_dedup_window() -> u64 {
    60
}

fn default_day_boundary() -> i32 {
    9
}

fn default_ten() -> usize {
    10
}

fn default_search_page() -> usize {
    50
}

fn default_top_authors() -> usize {
    20
}

fn default_top_genres() -> usize {
    40
}

fn default_upsell_url() -> String {
    "https://smartbrief.jp/link-account".to_string()
}
