//! Error types for the Reverie client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Reverie client.
///
/// The first four variants are the ones a user can see in the last-error
/// slot. The remaining ones come from local persistence and decoding and are
/// folded into the user-facing kinds before they reach the view layer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReverieError {
    /// A required field is missing. Raised before any remote call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure or non-success response from the service.
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The service answered but the payload lacks required fields.
    #[error("Interpretation error: {0}")]
    Interpretation(String),

    /// A chat message for this dream is already being sent.
    #[error("A message is already being sent for dream {dream_id}")]
    Busy { dream_id: i64 },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReverieError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a RemoteUnavailable error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable(message.into())
    }

    /// Creates an Interpretation error
    pub fn interpretation(message: impl Into<String>) -> Self {
        Self::Interpretation(message.into())
    }

    /// Creates a Busy error for the given dream
    pub fn busy(dream_id: i64) -> Self {
        Self::Busy { dream_id }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_))
    }

    pub fn is_interpretation(&self) -> bool {
        matches!(self, Self::Interpretation(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    // ============================================================================
    // Folding into user-facing kinds
    // ============================================================================

    /// Folds a malformed-response error into `RemoteUnavailable`.
    ///
    /// Used by every exchange except dream creation, where a malformed body
    /// means the interpretation is missing (see [`Self::into_interpretation`]).
    pub fn into_remote(self) -> Self {
        match self {
            Self::Serialization { format, message } => {
                Self::RemoteUnavailable(format!("malformed {} response: {}", format, message))
            }
            other => other,
        }
    }

    /// Folds a malformed-response error into `Interpretation`.
    pub fn into_interpretation(self) -> Self {
        match self {
            Self::Serialization { message, .. } => {
                Self::Interpretation(format!("incomplete dream payload: {}", message))
            }
            other => other,
        }
    }

    /// Human-readable line for the last-error slot.
    ///
    /// `fallback` is the operation-specific message used for service
    /// failures ("Failed to load dreams", ...). Validation and busy errors
    /// carry their own wording.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Busy { .. } => "A message is already being sent".to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ReverieError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ReverieError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ReverieError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ReverieError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ReverieError>`.
pub type Result<T> = std::result::Result<T, ReverieError>;
