//! Acara Store - Storage adapters
//!
//! This crate provides implementations of the `acara_core::ports::EventStore`
//! port: an in-memory adapter for development and testing, and a PostgreSQL
//! adapter for production.

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::{PostgresConfig, PostgresEventStore};
