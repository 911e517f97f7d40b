//! Favorites module - per-user bookmarked works.

mod entry;
mod store;

pub use entry::FavoriteEntry;
pub use store::FavoritesStore;
