//! Task management: the task aggregate, its ordering, and its lifecycle.
//!
//! A task owns its processes, related links, and images. The active board
//! ranks tasks by a derived sort date; completed tasks move to the archive.
//! The module follows hexagonal architecture:
//!
//! - Domain types and ordering in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
