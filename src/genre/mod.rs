//! Genre catalog for task classification.
//!
//! Genres have an independent lifecycle: tasks reference them by identifier
//! and the task context only ever looks them up. The module follows the same
//! hexagonal layout as [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Catalog service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
