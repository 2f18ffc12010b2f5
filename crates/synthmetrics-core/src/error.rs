//! Shared error type across synthmetrics crates.

use std::net::SocketAddr;

use thiserror::Error;

/// Stable error codes (used in logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Listener could not be bound.
    Bind,
    /// HTTP server failed after startup.
    Server,
    /// Fault inside a generator cycle.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Bind => "BIND",
            ErrorCode::Server => "SERVER",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SynthError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server: {0}")]
    Server(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SynthError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SynthError::Config(_) => ErrorCode::Config,
            SynthError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            SynthError::Bind { .. } => ErrorCode::Bind,
            SynthError::Server(_) => ErrorCode::Server,
            SynthError::Internal(_) => ErrorCode::Internal,
        }
    }
}
