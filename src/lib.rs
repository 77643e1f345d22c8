//! Taskmanager: personal task tracking with derived deadline ordering.
//!
//! Tasks carry work processes, related links, and image attachments. The
//! active board ranks tasks by a derived sort date and completed tasks move to
//! an archive.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`,
//!   filesystem)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, ordering, and lifecycle service
//! - [`genre`]: Genre catalog referenced by tasks
//! - [`postgres`]: Connection pool and schema bootstrap
//! - [`config`]: Environment configuration

pub mod config;
pub mod genre;
pub mod postgres;
pub mod task;
