//! Adapter implementations for genre ports.

pub mod memory;
pub mod postgres;
