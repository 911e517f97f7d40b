//! Catalog module - works, their client projection, and search.

mod display;
mod errors;
mod ranking;
mod search;
mod work;

pub use display::DisplayRecord;
pub use errors::CatalogError;
pub use ranking::{order_by_ids, top_genre_tags};
pub use search::{non_blank, Page, SearchCriteria, SearchFilter, SearchSort, MAX_PAGE_LIMIT};
pub use work::{Work, TRANSLATION_CATEGORY};
