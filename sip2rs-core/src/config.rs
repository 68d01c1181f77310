//! Engine-wide protocol settings

use std::time::Duration;

use crate::checksum;
use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_LANGUAGE, DEFAULT_PORT, DEFAULT_TIMEOUT, FIELD_TERMINATOR,
    MAX_RETRIES, MESSAGE_TERMINATOR,
};

/// Connection and session defaults read by every request and response
///
/// Fields are public so a caller can adjust them between requests (for
/// example switching the current patron); the `with_*` methods cover the
/// common setup path.
///
/// # Examples
///
/// ```
/// use sip2rs_core::ProtocolConfig;
///
/// let config = ProtocolConfig::new("acs.example.org", 6001)
///     .with_institution("MAIN")
///     .with_terminal_password("secret")
///     .with_patron("P0001", "1234");
///
/// assert!(config.checksum);
/// assert_eq!(config.field_terminator, b'|');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// ACS host name or address
    pub host: String,

    /// ACS port
    pub port: u16,

    /// Three-digit language code
    pub language: String,

    /// Institution id (`AO`)
    pub institution: String,

    /// Terminal password (`AC`)
    pub terminal_password: String,

    /// Terminal location code (`CP`, login only)
    pub location: String,

    /// Login user id algorithm code
    pub uid_algorithm: char,

    /// Login password algorithm code
    pub pwd_algorithm: char,

    /// Current patron identifier (`AA`)
    pub patron: String,

    /// Current patron password (`AD`)
    pub patron_password: String,

    /// Three-letter currency code for fee payments
    pub currency: String,

    /// Variable field terminator
    pub field_terminator: u8,

    /// Message terminator
    pub message_terminator: u8,

    /// Append and verify checksums
    pub checksum: bool,

    /// Append sequence digits
    pub sequence: bool,

    /// Consecutive checksum failures tolerated before giving up
    pub max_retries: u32,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// Bound on waiting for each response byte (None = wait forever)
    pub read_timeout: Option<Duration>,
}

impl ProtocolConfig {
    /// Create a config for the given ACS with protocol defaults
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    pub fn with_terminal_password(mut self, password: impl Into<String>) -> Self {
        self.terminal_password = password.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set login algorithm codes (carried on the wire, not implemented)
    pub fn with_algorithms(mut self, uid: char, pwd: char) -> Self {
        self.uid_algorithm = uid;
        self.pwd_algorithm = pwd;
        self
    }

    pub fn with_patron(mut self, patron: impl Into<String>, password: impl Into<String>) -> Self {
        self.patron = patron.into();
        self.patron_password = password.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_terminators(mut self, field: u8, message: u8) -> Self {
        self.field_terminator = field;
        self.message_terminator = message;
        self
    }

    /// Enable or disable checksum trailers
    pub fn with_checksum(mut self, enabled: bool) -> Self {
        self.checksum = enabled;
        self
    }

    /// Enable or disable sequence trailers
    pub fn with_sequence(mut self, enabled: bool) -> Self {
        self.sequence = enabled;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Verify a response checksum, passing everything through when
    /// checksums are disabled
    pub fn verify_checksum(&self, message: &[u8]) -> bool {
        !self.checksum || checksum::verify(message, self.message_terminator)
    }

    /// Byte-level framing rules for decoding responses
    pub fn framing(&self) -> Framing {
        Framing {
            field_terminator: self.field_terminator,
            message_terminator: self.message_terminator,
            checksum: self.checksum,
        }
    }

    /// `host:port` of the ACS
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            language: DEFAULT_LANGUAGE.to_string(),
            institution: String::new(),
            terminal_password: String::new(),
            location: String::new(),
            uid_algorithm: '0',
            pwd_algorithm: '0',
            patron: String::new(),
            patron_password: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            field_terminator: FIELD_TERMINATOR,
            message_terminator: MESSAGE_TERMINATOR,
            checksum: true,
            sequence: true,
            max_retries: MAX_RETRIES,
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            read_timeout: None,
        }
    }
}

/// Terminators and checksum flag used to take a response apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    pub field_terminator: u8,
    pub message_terminator: u8,
    pub checksum: bool,
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            field_terminator: FIELD_TERMINATOR,
            message_terminator: MESSAGE_TERMINATOR,
            checksum: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProtocolConfig::default();
        assert_eq!(config.port, 6001);
        assert_eq!(config.language, "001");
        assert_eq!(config.message_terminator, b'\r');
        assert_eq!(config.max_retries, 3);
        assert!(config.sequence);
        assert!(config.read_timeout.is_none());
    }

    #[test]
    fn test_verify_checksum_pass_through() {
        let config = ProtocolConfig::default().with_checksum(false);
        assert!(config.verify_checksum(b"garbage"));

        let config = config.with_checksum(true);
        assert!(!config.verify_checksum(b"garbage"));
        assert!(config.verify_checksum(b"990 402.00AY1AZFCB4\r"));
    }

    #[test]
    fn test_verify_checksum_custom_terminator() {
        let config = ProtocolConfig::default().with_terminators(b'|', b'~');
        assert!(config.verify_checksum(b"990 402.00AY1AZFCB4~"));
        assert!(!config.verify_checksum(b"990 402.00AY1AZFCB5~"));
    }

    #[test]
    fn test_framing() {
        let config = ProtocolConfig::default()
            .with_terminators(b'^', b'~')
            .with_checksum(false);
        let framing = config.framing();
        assert_eq!(framing.field_terminator, b'^');
        assert_eq!(framing.message_terminator, b'~');
        assert!(!framing.checksum);
        assert_eq!(ProtocolConfig::default().framing(), Framing::default());
    }

    #[test]
    fn test_address() {
        let config = ProtocolConfig::new("10.0.0.5", 6010);
        assert_eq!(config.address(), "10.0.0.5:6010");
    }
}
