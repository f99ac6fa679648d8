pub mod episode;
pub mod store;

pub use episode::{Episode, GameContent};
pub use store::{Catalog, CatalogEntry, EpisodeEntry, RetrieveEpisode, RetrieveQuiz};
