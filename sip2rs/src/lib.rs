//! # sip2rs
//!
//! Client engine for the SIP2 self-check circulation protocol.
//!
//! ## Features
//!
//! - Message builder with checksum and sequence trailers
//! - Table-driven response parsing for every response type
//! - Checksum verification with bounded automatic resend
//! - Async/await API using Tokio
//!
//! ## Quick Start
//!
//! ```no_run
//! use sip2rs::{Client, ProtocolConfig};
//!
//! #[tokio::main]
//! async fn main() -> sip2rs::Result<()> {
//!     let config = ProtocolConfig::new("acs.example.org", 6001)
//!         .with_institution("MAIN")
//!         .with_patron("P0001", "1234");
//!
//!     let mut client = Client::new(config);
//!     client.connect().await?;
//!
//!     let status = client.sc_status().await?;
//!     println!("Online: {:?}", status.text("Online"));
//!
//!     let item = client.item_information("31234000123456").await?;
//!     println!("Title: {:?}", item.field("AJ"));
//!
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

// Re-exports
pub use client::Client;
pub use error::{Error, Result};

// Re-export protocol types
pub use sip2rs_core::request::{self, Request};
pub use sip2rs_core::{
    checksum, FixedValue, MessageType, ParsedResponse, ProtocolConfig, SequenceCounter,
    WireMessage, PROTOCOL_VERSION,
};
pub use sip2rs_transport::{StreamTransport, TcpTransport, Transport};
pub use sip2rs_types::{timestamp, HoldMode, HoldType, PatronStatus, SummaryType};
