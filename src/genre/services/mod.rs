//! Application services for the genre catalog.

mod catalog;

pub use catalog::{DEFAULT_GENRES, GenreCatalogError, GenreCatalogResult, GenreCatalogService};
