//! Message framing and checksum retry
//!
//! A response is every byte up to and including the message terminator.
//! When checksums are enabled a response that fails verification, or an
//! ACS request to resend (`96`), causes the same request bytes to be
//! written again, up to the configured number of retries.
//!
//! A read timeout or an oversized response leaves the stream at an unknown
//! position inside a message, so the transport is disconnected before the
//! error is returned.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use sip2rs_core::checksum;
use sip2rs_core::response::trim_message;
use sip2rs_core::{redact, MessageType, ProtocolConfig};

use crate::{error::*, Transport};

/// Upper bound on a single response
pub const MAX_MESSAGE_LEN: usize = 64 * 1024;

/// Runs request/response exchanges over a transport
pub struct Framer<T> {
    transport: T,
    terminator: u8,
    field_terminator: u8,
    checksum: bool,
    max_retries: u32,
    failures: u32,
}

impl<T: Transport> Framer<T> {
    /// Create a framer using the terminator, checksum, retry and read
    /// timeout settings of `config`
    pub fn new(transport: T, config: &ProtocolConfig) -> Self {
        let mut framer = Self {
            transport,
            terminator: config.message_terminator,
            field_terminator: config.field_terminator,
            checksum: config.checksum,
            max_retries: config.max_retries,
            failures: 0,
        };
        framer.configure(config);
        framer
    }

    /// Pick up changed settings, including the transport read timeout
    pub fn configure(&mut self, config: &ProtocolConfig) {
        self.terminator = config.message_terminator;
        self.field_terminator = config.field_terminator;
        self.checksum = config.checksum;
        self.max_retries = config.max_retries;
        self.transport.set_read_timeout(config.read_timeout);
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Consecutive rejected responses in the last exchange
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Write a complete message
    pub async fn send(&mut self, message: &[u8]) -> Result<()> {
        self.log("->", message);
        self.transport.send(message).await
    }

    fn log(&self, direction: &str, message: &[u8]) {
        let body = trim_message(message, self.terminator);
        debug!(
            "{} {} ({} bytes)",
            direction,
            String::from_utf8_lossy(body.get(..2).unwrap_or(body)),
            message.len()
        );
        trace!("{} {:?}", direction, redact(body, self.field_terminator));
    }

    /// Read bytes up to and including the message terminator
    ///
    /// End of stream before any byte arrives is `ConnectionClosed`; end of
    /// stream after a partial message returns what was read. On
    /// `ReadTimeout` or `MessageTooLong` the transport is disconnected.
    pub async fn receive(&mut self) -> Result<Bytes> {
        match self.read_message().await {
            Err(e @ (Error::ReadTimeout | Error::MessageTooLong { .. })) => {
                warn!("Dropping connection to {}: {}", self.transport.remote_addr(), e);
                let _ = self.transport.disconnect().await;
                Err(e)
            }
            result => result,
        }
    }

    async fn read_message(&mut self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(256);

        loop {
            match self.transport.read_byte().await? {
                Some(byte) => {
                    buf.put_u8(byte);
                    if byte == self.terminator {
                        break;
                    }
                    if buf.len() >= MAX_MESSAGE_LEN {
                        return Err(Error::MessageTooLong { max: MAX_MESSAGE_LEN });
                    }
                }
                None if buf.is_empty() => return Err(Error::ConnectionClosed),
                None => {
                    warn!("Stream ended after {} bytes without a terminator", buf.len());
                    break;
                }
            }
        }

        self.log("<-", &buf);
        Ok(buf.freeze())
    }

    /// Send a request and return the first acceptable response
    pub async fn exchange(&mut self, message: &[u8]) -> Result<Bytes> {
        self.failures = 0;
        self.send(message).await?;

        loop {
            let response = self.receive().await?;

            let resend_requested =
                MessageType::of_message(trim_message(&response, self.terminator)) == Some(MessageType::RequestScResend);
            let valid = !self.checksum || checksum::verify(&response, self.terminator);

            if valid && !resend_requested {
                trace!("Response accepted after {} resends", self.failures);
                return Ok(response);
            }

            if self.failures >= self.max_retries {
                warn!("Giving up after {} resends", self.failures);
                return Err(Error::ChecksumExhausted { resends: self.failures });
            }

            self.failures += 1;
            if resend_requested {
                warn!("ACS asked for a resend ({}/{})", self.failures, self.max_retries);
            } else {
                warn!("Checksum mismatch, resending ({}/{})", self.failures, self.max_retries);
            }
            self.send(message).await?;
        }
    }
}
