//! High-level client interface

use tracing::{debug, info, warn};

use sip2rs_core::request::{self as req, Request};
use sip2rs_core::{ParsedResponse, ProtocolConfig, SequenceCounter};
use sip2rs_transport::{Framer, TcpTransport, Transport};
use sip2rs_types::{HoldMode, SummaryType};

use crate::error::{Error, Result};

/// Self-check client
///
/// Owns the protocol settings, the sequence counter and the connection.
/// One request is in flight at a time; callers sharing a client across
/// tasks wrap it in a `tokio::sync::Mutex`.
///
/// # Examples
///
/// ```no_run
/// use sip2rs::{Client, ProtocolConfig};
///
/// #[tokio::main]
/// async fn main() -> sip2rs::Result<()> {
///     let config = ProtocolConfig::new("acs.example.org", 6001)
///         .with_institution("MAIN")
///         .with_patron("P0001", "1234");
///
///     let mut client = Client::new(config);
///     client.connect().await?;
///
///     let login = client.login("sc01", "secret").await?;
///     println!("Login ok: {:?}", login.text("Ok"));
///
///     let info = client.patron_information(Default::default()).await?;
///     println!("Patron: {:?}", info.field("AE"));
///
///     client.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Client {
    config: ProtocolConfig,
    sequence: SequenceCounter,
    framer: Framer<Box<dyn Transport>>,
}

impl Client {
    /// Create a client that dials `config.host:config.port` over TCP
    pub fn new(config: ProtocolConfig) -> Self {
        let transport = TcpTransport::new(config.host.clone(), config.port)
            .with_connect_timeout(config.connect_timeout);

        Self::with_transport(config, transport)
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(config: ProtocolConfig, transport: impl Transport + 'static) -> Self {
        let framer = Framer::new(Box::new(transport) as Box<dyn Transport>, &config);

        Self {
            config,
            sequence: SequenceCounter::new(),
            framer,
        }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Settings may change between requests (e.g. the current patron)
    ///
    /// Framing, checksum, retry and read timeout changes apply from the next
    /// request. `host`, `port` and `connect_timeout` are read only when the
    /// client is created.
    pub fn config_mut(&mut self) -> &mut ProtocolConfig {
        &mut self.config
    }

    /// Switch the patron used by patron-scoped requests
    pub fn set_patron(&mut self, patron: impl Into<String>, password: impl Into<String>) {
        self.config.patron = patron.into();
        self.config.patron_password = password.into();
    }

    /// Sequence digit the next sequenced request will carry
    pub fn next_sequence(&self) -> u8 {
        self.sequence.peek()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.framer.transport().is_connected()
    }

    /// Open the connection
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.framer.transport().remote_addr());
        self.framer.transport_mut().connect().await?;
        info!("Connected");
        Ok(())
    }

    /// Close the connection
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.framer.transport().remote_addr());
        self.framer.transport_mut().disconnect().await?;
        info!("Disconnected");
        Ok(())
    }

    /// Send a request and parse the response
    ///
    /// A response with a different code than the request expects is
    /// logged and still returned.
    pub async fn call<R: Request>(&mut self, request: &R) -> Result<ParsedResponse> {
        if !R::EXPECTS_REPLY {
            return Err(Error::NoReply(R::TYPE));
        }
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }

        let wire = req::encode(request, &self.config, &mut self.sequence)?;

        self.framer.configure(&self.config);
        let raw = self.framer.exchange(wire.as_bytes()).await?;
        let response = ParsedResponse::parse(&raw, &self.config);

        match R::RESPONSE {
            Some(expected) if response.message_type() != Some(expected) => {
                warn!(
                    "Expected {} in reply to {}, got {:?}",
                    expected,
                    R::TYPE,
                    response.code()
                );
            }
            _ => debug!("{} answered with {:?}", R::TYPE, response.code()),
        }

        Ok(response)
    }

    /// Send a request without waiting for a response
    pub async fn send<R: Request>(&mut self, request: &R) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }

        let wire = req::encode(request, &self.config, &mut self.sequence)?;
        self.framer.send(wire.as_bytes()).await?;
        Ok(())
    }

    /// Log the terminal in (93)
    pub async fn login(&mut self, user: &str, password: &str) -> Result<ParsedResponse> {
        self.call(&req::Login {
            user: user.to_string(),
            password: password.to_string(),
        })
        .await
    }

    /// Report terminal status and fetch ACS capabilities (99)
    pub async fn sc_status(&mut self) -> Result<ParsedResponse> {
        self.call(&req::ScStatus::default()).await
    }

    /// Ask the ACS to repeat its last response (97)
    pub async fn request_resend(&mut self) -> Result<ParsedResponse> {
        self.call(&req::RequestResend).await
    }

    /// Current patron status (23)
    pub async fn patron_status(&mut self) -> Result<ParsedResponse> {
        self.call(&req::PatronStatus::default()).await
    }

    /// Current patron details with an optional item summary (63)
    pub async fn patron_information(&mut self, summary: SummaryType) -> Result<ParsedResponse> {
        self.call(&req::PatronInformation {
            summary,
            ..Default::default()
        })
        .await
    }

    /// Check an item out to the current patron (11)
    pub async fn checkout(&mut self, item: &str) -> Result<ParsedResponse> {
        self.call(&req::Checkout {
            item: item.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Return an item (09)
    pub async fn checkin(&mut self, item: &str, location: &str) -> Result<ParsedResponse> {
        self.call(&req::Checkin {
            item: item.to_string(),
            location: location.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Block the current patron's card (01); the ACS sends no reply
    pub async fn block_patron(&mut self, message: &str, card_retained: bool) -> Result<()> {
        self.send(&req::BlockPatron {
            message: message.to_string(),
            card_retained,
            ..Default::default()
        })
        .await
    }

    /// End the current patron's session (35)
    pub async fn end_patron_session(&mut self) -> Result<ParsedResponse> {
        self.call(&req::EndPatronSession::default()).await
    }

    /// Pay a fee for the current patron (37)
    pub async fn fee_paid(&mut self, fee_type: u8, payment_type: u8, amount: &str) -> Result<ParsedResponse> {
        self.call(&req::FeePaid {
            fee_type,
            payment_type,
            amount: amount.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Item details (17)
    pub async fn item_information(&mut self, item: &str) -> Result<ParsedResponse> {
        self.call(&req::ItemInformation {
            item: item.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Update item properties (19)
    pub async fn item_status_update(&mut self, item: &str, properties: &str) -> Result<ParsedResponse> {
        self.call(&req::ItemStatusUpdate {
            item: item.to_string(),
            item_properties: properties.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Re-enable a blocked patron (25)
    pub async fn patron_enable(&mut self) -> Result<ParsedResponse> {
        self.call(&req::PatronEnable::default()).await
    }

    /// Place, cancel or change a hold on an item (15)
    pub async fn hold(&mut self, mode: HoldMode, item: &str) -> Result<ParsedResponse> {
        self.call(&req::Hold {
            mode,
            item: item.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Renew one item (29)
    pub async fn renew(&mut self, item: &str) -> Result<ParsedResponse> {
        self.call(&req::Renew {
            item: item.to_string(),
            ..Default::default()
        })
        .await
    }

    /// Renew every item the current patron has out (65)
    pub async fn renew_all(&mut self) -> Result<ParsedResponse> {
        self.call(&req::RenewAll::default()).await
    }
}
