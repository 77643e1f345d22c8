//! Domain model for the genre catalog.

mod error;
mod genre;
mod ids;

pub use error::GenreDomainError;
pub use genre::{Genre, PersistedGenreData};
pub use ids::{GenreId, GenreName};
