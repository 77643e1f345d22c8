//! In-memory genre adapters.

mod genre;

pub use genre::InMemoryGenreRepository;
