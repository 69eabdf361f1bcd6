//! Acara Core - Domain models, geospatial math, filtering, and moderation
//!
//! This crate contains the business rules of the event finder: the event and
//! submission models, the proximity/date/keyword filter, the moderation state
//! machine, and the storage port the workflow drives.

pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod models;
pub mod moderation;
pub mod ports;

pub use error::{AcaraError, Result};
