//! High-level error types

use sip2rs_core::MessageType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] sip2rs_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] sip2rs_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] sip2rs_types::Error),
    
    #[error("Not connected")]
    NotConnected,
    
    #[error("{0} has no response; use send")]
    NoReply(MessageType),
}

impl Error {
    /// Request parameters were rejected before anything was sent
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Core(e) => e.is_validation(),
            Self::Types(sip2rs_types::Error::Validation(_)) => true,
            _ => false,
        }
    }
}
