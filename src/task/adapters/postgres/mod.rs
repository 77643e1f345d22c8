//! `PostgreSQL` adapters for task aggregate persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTaskRepository;
