//! Protocol message type codes

use std::fmt;

use crate::error::{Error, Result};

/// Two-character message identifiers
///
/// Requests travel from the self-check terminal (SC) to the circulation
/// system (ACS); responses travel back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MessageType {
    // Requests
    BlockPatron,
    Checkin,
    Checkout,
    Hold,
    ItemInformation,
    ItemStatusUpdate,
    PatronStatusRequest,
    PatronEnable,
    Renew,
    EndPatronSession,
    FeePaid,
    PatronInformation,
    RenewAll,
    Login,
    RequestAcsResend,
    ScStatus,

    // Responses
    CheckinResponse,
    CheckoutResponse,
    HoldResponse,
    ItemInformationResponse,
    ItemStatusUpdateResponse,
    PatronStatusResponse,
    PatronEnableResponse,
    RenewResponse,
    EndSessionResponse,
    FeePaidResponse,
    PatronInformationResponse,
    RenewAllResponse,
    LoginResponse,
    RequestScResend,
    AcsStatus,
}

impl MessageType {
    /// Every known message type
    pub const ALL: [MessageType; 31] = [
        Self::BlockPatron,
        Self::Checkin,
        Self::Checkout,
        Self::Hold,
        Self::ItemInformation,
        Self::ItemStatusUpdate,
        Self::PatronStatusRequest,
        Self::PatronEnable,
        Self::Renew,
        Self::EndPatronSession,
        Self::FeePaid,
        Self::PatronInformation,
        Self::RenewAll,
        Self::Login,
        Self::RequestAcsResend,
        Self::ScStatus,
        Self::CheckinResponse,
        Self::CheckoutResponse,
        Self::HoldResponse,
        Self::ItemInformationResponse,
        Self::ItemStatusUpdateResponse,
        Self::PatronStatusResponse,
        Self::PatronEnableResponse,
        Self::RenewResponse,
        Self::EndSessionResponse,
        Self::FeePaidResponse,
        Self::PatronInformationResponse,
        Self::RenewAllResponse,
        Self::LoginResponse,
        Self::RequestScResend,
        Self::AcsStatus,
    ];

    /// Wire code
    pub fn code(self) -> &'static str {
        match self {
            Self::BlockPatron => "01",
            Self::Checkin => "09",
            Self::Checkout => "11",
            Self::Hold => "15",
            Self::ItemInformation => "17",
            Self::ItemStatusUpdate => "19",
            Self::PatronStatusRequest => "23",
            Self::PatronEnable => "25",
            Self::Renew => "29",
            Self::EndPatronSession => "35",
            Self::FeePaid => "37",
            Self::PatronInformation => "63",
            Self::RenewAll => "65",
            Self::Login => "93",
            Self::RequestAcsResend => "97",
            Self::ScStatus => "99",
            Self::CheckinResponse => "10",
            Self::CheckoutResponse => "12",
            Self::HoldResponse => "16",
            Self::ItemInformationResponse => "18",
            Self::ItemStatusUpdateResponse => "20",
            Self::PatronStatusResponse => "24",
            Self::PatronEnableResponse => "26",
            Self::RenewResponse => "30",
            Self::EndSessionResponse => "36",
            Self::FeePaidResponse => "38",
            Self::PatronInformationResponse => "64",
            Self::RenewAllResponse => "66",
            Self::LoginResponse => "94",
            Self::RequestScResend => "96",
            Self::AcsStatus => "98",
        }
    }

    /// Check if this is a request (SC to ACS)
    pub fn is_request(self) -> bool {
        !self.is_response()
    }

    /// Check if this is a response (ACS to SC)
    pub fn is_response(self) -> bool {
        matches!(
            self,
            Self::CheckinResponse
                | Self::CheckoutResponse
                | Self::HoldResponse
                | Self::ItemInformationResponse
                | Self::ItemStatusUpdateResponse
                | Self::PatronStatusResponse
                | Self::PatronEnableResponse
                | Self::RenewResponse
                | Self::EndSessionResponse
                | Self::FeePaidResponse
                | Self::PatronInformationResponse
                | Self::RenewAllResponse
                | Self::LoginResponse
                | Self::RequestScResend
                | Self::AcsStatus
        )
    }

    /// Identify the message type of a raw message from its first two bytes
    pub fn of_message(message: &[u8]) -> Option<Self> {
        let code = message.get(..2)?;
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code().as_bytes() == code)
    }
}

impl TryFrom<&str> for MessageType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == value)
            .ok_or_else(|| Error::UnknownMessageType(value.to_string()))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_message_type_conversion() {
        assert_eq!(MessageType::Login.code(), "93");
        assert_eq!(MessageType::try_from("98").unwrap(), MessageType::AcsStatus);
        assert!(MessageType::try_from("XX").is_err());
    }

    #[test]
    fn test_codes_unique() {
        let codes: HashSet<_> = MessageType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes.len(), MessageType::ALL.len());
    }

    #[test]
    fn test_request_response_split() {
        assert!(MessageType::Checkout.is_request());
        assert!(MessageType::CheckoutResponse.is_response());
        assert_eq!(MessageType::ALL.iter().filter(|t| t.is_request()).count(), 16);
    }

    #[test]
    fn test_of_message() {
        assert_eq!(
            MessageType::of_message(b"941AY0AZFDFC\r"),
            Some(MessageType::LoginResponse)
        );
        assert_eq!(MessageType::of_message(b"9"), None);
        assert_eq!(MessageType::of_message(b"XY..."), None);
    }
}
