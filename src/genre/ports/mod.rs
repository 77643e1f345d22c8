//! Port contracts for the genre catalog.

pub mod repository;

pub use repository::{GenreRepository, GenreRepositoryError, GenreRepositoryResult};
