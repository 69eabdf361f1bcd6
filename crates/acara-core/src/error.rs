//! Error types for Acara

use thiserror::Error;

use crate::models::{EventId, Status};

#[derive(Debug, Error)]
pub enum AcaraError {
    // Filter errors
    #[error("Invalid filter argument {param}: {reason}")]
    InvalidArgument { param: String, reason: String },

    // Submission errors
    #[error("Invalid submission field {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Location ({lat}, {lng}) is outside the province boundary")]
    OutOfBounds { lat: f64, lng: f64 },

    // Moderation errors
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("Event not found: {event_id}")]
    NotFound { event_id: EventId },

    // Storage errors
    #[error("Persistence failure: {0}")]
    Persistence(String),

    // Boundary geometry errors
    #[error("Invalid boundary geometry: {reason}")]
    BoundaryInvalid { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AcaraError>;
