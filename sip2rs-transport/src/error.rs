//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,
    
    #[error("Already connected")]
    AlreadyConnected,
    
    #[error("Connection timeout")]
    ConnectionTimeout,
    
    #[error("Read timeout")]
    ReadTimeout,
    
    #[error("Connection closed by remote")]
    ConnectionClosed,
    
    #[error("Message exceeds {max} bytes without a terminator")]
    MessageTooLong {
        max: usize,
    },
    
    #[error("Checksum verification failed after {resends} resends")]
    ChecksumExhausted {
        resends: u32,
    },
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Check if the connection is still usable after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ChecksumExhausted { .. })
    }
}
