//! Book handlers - detail views, rankings, history, favorites, and search.

mod favorites;
mod get_history;
mod get_ranking;
mod search_works;
mod view_work;

pub use favorites::{CheckFavoriteHandler, FavoriteCommand, ListFavoritesHandler, ToggleFavoriteHandler};
pub use get_history::{GetHistoryHandler, GetHistoryQuery};
pub use get_ranking::GetRankingHandler;
pub use search_works::{ListAuthorsHandler, ListGenresHandler, SearchWorksHandler, SuggestWorksHandler};
pub use view_work::{ViewWorkCommand, ViewWorkHandler, ViewWorkResult};
