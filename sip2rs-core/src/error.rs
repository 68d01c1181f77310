//! Error types for sip2rs-core

use crate::message_type::MessageType;

/// Result type alias for sip2rs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller input rejected before anything was built
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
    
    /// A fixed field was offered after the first variable field
    #[error("Fixed field rejected: message {code} already has variable fields")]
    FixedAfterVariable {
        code: MessageType,
    },
    
    /// Two-character code not known to the protocol
    #[error("Unknown message type: {0:?}")]
    UnknownMessageType(String),
    
    /// Typed value error
    #[error("Type error: {0}")]
    Types(#[from] sip2rs_types::Error),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
    
    /// Check if the caller's input was rejected (nothing was sent)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Types(sip2rs_types::Error::Validation(_))
        )
    }
}
