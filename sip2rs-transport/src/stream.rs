//! Transport over any async byte stream
//!
//! Useful when the caller dials the connection itself (TLS wrappers,
//! serial bridges) and for in-memory pipes in tests.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{error::*, Transport};

/// Read one byte, mapping end of stream to `None`
pub(crate) async fn read_one<R>(reader: &mut R, read_timeout: Option<Duration>) -> Result<Option<u8>>
where
    R: AsyncRead + Unpin + Send,
{
    let result = match read_timeout {
        Some(limit) => timeout(limit, reader.read_u8())
            .await
            .map_err(|_| Error::ReadTimeout)?,
        None => reader.read_u8().await,
    };

    match result {
        Ok(byte) => Ok(Some(byte)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Transport wrapping an already-open stream
pub struct StreamTransport<S> {
    stream: Option<BufStream<S>>,
    label: String,
    read_timeout: Option<Duration>,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    /// Wrap an open stream
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(BufStream::new(stream)),
            label: "stream".to_string(),
            read_timeout: None,
        }
    }

    /// Name reported by `remote_addr`
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Bound the wait for each response byte
    ///
    /// A `Framer` replaces this with `ProtocolConfig::read_timeout`.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    async fn connect(&mut self) -> Result<()> {
        // The stream arrives open; once closed it cannot be reopened
        if self.stream.is_some() {
            Ok(())
        } else {
            Err(Error::ConnectionClosed)
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Closing {}", self.label);
            let _ = stream.shutdown().await;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes to {}", data.len(), self.label);

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn read_byte(&mut self) -> Result<Option<u8>> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
        read_one(stream, self.read_timeout).await
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.read_timeout = timeout;
    }

    fn remote_addr(&self) -> String {
        self.label.clone()
    }
}
