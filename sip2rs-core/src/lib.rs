//! # sip2rs-core
//!
//! Protocol engine for SIP2 self-check terminals.
//!
//! This crate provides the low-level protocol primitives:
//! - Message building (fixed and variable fields, trailers)
//! - Response decoding with per-message layouts
//! - Checksum calculation and sequence numbering
//! - The request catalog

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod message;
pub mod message_type;
pub mod request;
pub mod response;
pub mod sequence;

pub use config::{Framing, ProtocolConfig};
pub use error::{Error, Result};
pub use message::{redact, FieldOutcome, MessageBuilder, Phase, Trailer, WireMessage};
pub use message_type::MessageType;
pub use request::Request;
pub use response::{FixedValue, ParsedResponse};
pub use sequence::SequenceCounter;

/// Highest protocol version this engine speaks
pub const PROTOCOL_VERSION: &str = "2.00";
