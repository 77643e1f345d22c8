//! `PostgreSQL` adapters for the genre catalog.

mod models;
mod repository;
mod schema;

pub use repository::PostgresGenreRepository;
