//! Error types for engine operations

use crate::types::{Extension, ExtensionStatus};
use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur when driving the GIS engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// I/O error talking to the bridge process
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request or reply could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The scripting interpreter could not be started
    #[error("Failed to start engine interpreter {interpreter}: {source}")]
    Spawn {
        /// Interpreter that was launched
        interpreter: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The bridge broke the request/reply protocol
    #[error("Engine protocol error: {0}")]
    Protocol(String),

    /// The engine reported a failure for an operation
    #[error("{op} failed: {message}")]
    OperationFailed {
        /// Operation name
        op: &'static str,
        /// Message reported by the engine
        message: String,
    },

    /// A licensed extension is required but not available
    #[error("{extension} extension required (status: {status})")]
    ExtensionUnavailable {
        /// Extension that was requested
        extension: Extension,
        /// Status reported by the engine
        status: ExtensionStatus,
    },

    /// An operation parameter is out of range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
