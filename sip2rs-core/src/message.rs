//! Outbound message construction
//!
//! # Message Structure
//!
//! ```text
//! ┌──────┬──────────────┬─────────────────────┬──────────┬──────────┬────┐
//! │ Code │ Fixed fields │ Variable fields     │ Sequence │ Checksum │ CR │
//! │  2   │ space-padded │ CODE value |  ...   │ AY + 1   │ AZ + 4   │ 1  │
//! └──────┴──────────────┴─────────────────────┴──────────┴──────────┴────┘
//! ```
//!
//! A builder starts in the fixed phase. The first variable field that is
//! actually written moves it to the variable phase for good; fixed fields
//! offered after that are rejected and leave the buffer untouched.

use std::borrow::Cow;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::{
    checksum,
    config::ProtocolConfig,
    constants::{fields, MAX_VARIABLE_LEN},
    error::{Error, Result},
    message_type::MessageType,
};

/// Builder phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fixed,
    Variable,
}

/// Result of offering a variable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Field written to the buffer
    Appended,
    /// Optional field with an empty value, nothing written
    Skipped,
}

/// Which trailers `finalize` appends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub sequence: bool,
    pub checksum: bool,
}

impl Trailer {
    /// Trailers as configured engine-wide
    pub fn from_config(config: &ProtocolConfig) -> Self {
        Self {
            sequence: config.sequence,
            checksum: config.checksum,
        }
    }

    /// Same trailers minus the sequence field
    pub fn without_sequence(self) -> Self {
        Self {
            sequence: false,
            ..self
        }
    }
}

/// Builder for one outbound message
///
/// # Examples
///
/// ```
/// use sip2rs_core::{MessageBuilder, MessageType, ProtocolConfig};
///
/// let config = ProtocolConfig::default();
/// let mut builder = MessageBuilder::new(MessageType::ScStatus, &config);
/// builder.add_fixed("0", 1).unwrap();
/// builder.add_fixed("80", 3).unwrap();
/// builder.add_fixed("2.00", 4).unwrap();
///
/// let wire = builder.finalize(Some(1), true);
/// assert_eq!(wire.as_bytes(), b"990 802.00AY1AZFCB0\r");
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    code: MessageType,
    buf: BytesMut,
    phase: Phase,
    field_terminator: u8,
    message_terminator: u8,
}

impl MessageBuilder {
    /// Start a new message with the configured terminators
    pub fn new(code: MessageType, config: &ProtocolConfig) -> Self {
        Self::with_terminators(code, config.field_terminator, config.message_terminator)
    }

    /// Start a new message with explicit terminators
    pub fn with_terminators(code: MessageType, field_terminator: u8, message_terminator: u8) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_slice(code.code().as_bytes());

        Self {
            code,
            buf,
            phase: Phase::Fixed,
            field_terminator,
            message_terminator,
        }
    }

    pub fn code(&self) -> MessageType {
        self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Bytes built so far
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Append a fixed-width field
    ///
    /// The value is truncated to `width` bytes and right-justified with
    /// spaces. Numeric formatting is the caller's job.
    pub fn add_fixed(&mut self, value: &str, width: usize) -> Result<()> {
        if self.phase == Phase::Variable {
            debug!(code = %self.code, value, "Fixed field after variable fields rejected");
            return Err(Error::FixedAfterVariable { code: self.code });
        }

        let bytes = value.as_bytes();
        let taken = &bytes[..bytes.len().min(width)];

        self.buf.put_bytes(b' ', width - taken.len());
        self.buf.put_slice(taken);

        Ok(())
    }

    /// Append a variable field
    ///
    /// An optional field with an empty value is skipped entirely; anything
    /// else is written as `code` + value (at most 255 bytes) + terminator.
    pub fn add_variable(&mut self, code: &str, value: &str, optional: bool) -> FieldOutcome {
        if optional && value.is_empty() {
            return FieldOutcome::Skipped;
        }

        let bytes = value.as_bytes();
        let taken = &bytes[..bytes.len().min(MAX_VARIABLE_LEN)];

        self.phase = Phase::Variable;
        self.buf.put_slice(code.as_bytes());
        self.buf.put_slice(taken);
        self.buf.put_u8(self.field_terminator);

        FieldOutcome::Appended
    }

    /// Append trailers and the terminator
    ///
    /// The checksum covers everything before it, including the sequence
    /// field and the `AZ` code itself.
    pub fn finalize(mut self, sequence: Option<u8>, with_checksum: bool) -> WireMessage {
        if let Some(digit) = sequence {
            self.buf.put_slice(fields::SEQUENCE_NUMBER.as_bytes());
            self.buf.put_u8(b'0' + digit % 10);
        }

        if with_checksum {
            self.buf.put_slice(fields::CHECKSUM.as_bytes());
            let cs = checksum::calculate(&self.buf);
            self.buf.put_slice(cs.as_bytes());
        }

        self.buf.put_u8(self.message_terminator);

        let wire = WireMessage {
            code: self.code,
            bytes: self.buf.freeze(),
            field_terminator: self.field_terminator,
        };

        trace!("Built message: {}", wire);

        wire
    }
}

/// A finalized, immutable outbound message
#[derive(Clone, PartialEq, Eq)]
pub struct WireMessage {
    code: MessageType,
    bytes: Bytes,
    field_terminator: u8,
}

impl WireMessage {
    pub fn code(&self) -> MessageType {
        self.code
    }

    /// Complete wire bytes, terminator included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Message text with the terminator stripped
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.body())
    }

    /// Message text with credential values masked, for logging
    pub fn redacted(&self) -> String {
        redact(self.body(), self.field_terminator)
    }

    fn body(&self) -> &[u8] {
        match self.bytes.split_last() {
            Some((_, rest)) => rest,
            None => &self.bytes[..],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for WireMessage {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireMessage")
            .field("code", &self.code)
            .field("text", &self.redacted())
            .finish()
    }
}

/// Masked like [`WireMessage::redacted`]; use [`WireMessage::text`] for
/// the exact bytes
impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Variable fields whose values are masked in logs
pub const REDACTED_FIELDS: [&str; 4] = [
    fields::LOGIN_USER_ID,
    fields::LOGIN_PASSWORD,
    fields::TERMINAL_PASSWORD,
    fields::PATRON_PASSWORD,
];

fn is_redacted(code: &[u8]) -> bool {
    REDACTED_FIELDS.iter().any(|f| f.as_bytes() == code)
}

/// Render a message for logging with the values of [`REDACTED_FIELDS`]
/// replaced by `***`
///
/// The first variable field shares a segment with the fixed fields, so a
/// credential code there is found by searching past the message code;
/// a lookalike inside fixed data masks more than needed, never less.
pub fn redact(message: &[u8], field_terminator: u8) -> String {
    let mut out = Vec::with_capacity(message.len());

    for (i, segment) in message.split(|&b| b == field_terminator).enumerate() {
        if i > 0 {
            out.push(field_terminator);
        }

        let code_at = if i == 0 {
            (2..segment.len().saturating_sub(1)).find(|&p| is_redacted(&segment[p..p + 2]))
        } else {
            segment.get(..2).filter(|code| is_redacted(code)).map(|_| 0)
        };

        match code_at {
            Some(p) if segment.len() > p + 2 => {
                out.extend_from_slice(&segment[..p + 2]);
                out.extend_from_slice(b"***");
            }
            _ => out.extend_from_slice(segment),
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
