//! Transport layer for the SIP2 protocol
//!
//! Provides byte-stream transports and the message framer that runs
//! request/response exchanges over them.

pub mod error;
pub mod framer;
pub mod stream;
pub mod tcp;

pub use error::{Error, Result};
pub use framer::Framer;
pub use stream::StreamTransport;
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;

/// Byte stream to an ACS
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the connection
    async fn connect(&mut self) -> Result<()>;
    
    /// Close the connection
    async fn disconnect(&mut self) -> Result<()>;
    
    /// Check if connected
    fn is_connected(&self) -> bool;
    
    /// Write raw bytes and flush
    async fn send(&mut self, data: &[u8]) -> Result<()>;
    
    /// Read a single byte (None at end of stream)
    async fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Bound the wait for each byte read; `None` blocks
    fn set_read_timeout(&mut self, timeout: Option<Duration>);
    
    /// Get remote address
    fn remote_addr(&self) -> String;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn connect(&mut self) -> Result<()> {
        (**self).connect().await
    }

    async fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect().await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data).await
    }

    async fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte().await
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        (**self).set_read_timeout(timeout)
    }

    fn remote_addr(&self) -> String {
        (**self).remote_addr()
    }
}
