//! services/gateway/src/error.rs
//!
//! Defines the startup error type for the gateway binary. Request-time errors
//! are `PortError`s rendered by `web::response::ApiFailure`.

use crate::config::ConfigError;

/// The primary error type for the `gateway` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backend endpoint could not be turned into a gRPC channel.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
