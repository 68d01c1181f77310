//! Request catalog
//!
//! One type per protocol request. Each knows its message code, the code of
//! the response it expects, and the exact order of its fields. Parameter
//! checks run before anything is built, so a rejected request never
//! consumes a sequence digit.
//!
//! Institution, terminal password, patron credentials, language and
//! currency come from [`ProtocolConfig`]; everything else is a field of
//! the request value.

use chrono::NaiveDateTime;
use tracing::debug;

use sip2rs_types::{timestamp, HoldMode, HoldType, SummaryType};

use crate::{
    config::ProtocolConfig,
    constants::fields,
    error::{Error, Result},
    message::{MessageBuilder, Trailer, WireMessage},
    message_type::MessageType,
    sequence::SequenceCounter,
};

/// A protocol request
pub trait Request {
    /// Message code sent
    const TYPE: MessageType;

    /// Message code expected back (None when any response may arrive)
    const RESPONSE: Option<MessageType>;

    /// Whether the ACS answers this request at all
    const EXPECTS_REPLY: bool = true;

    /// Check parameters and write fields in wire order
    fn encode(&self, builder: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()>;

    /// Trailers to append
    fn trailer(&self, config: &ProtocolConfig) -> Trailer {
        Trailer::from_config(config)
    }
}

/// Build the finalized wire message for a request
///
/// A sequence digit is drawn only when the request carries a sequence
/// field and its parameters were accepted.
pub fn encode<R: Request>(
    request: &R,
    config: &ProtocolConfig,
    sequence: &mut SequenceCounter,
) -> Result<WireMessage> {
    let mut builder = MessageBuilder::new(R::TYPE, config);
    request.encode(&mut builder, config)?;

    let trailer = request.trailer(config);
    let digit = trailer.sequence.then(|| sequence.next());
    let wire = builder.finalize(digit, trailer.checksum);

    debug!(code = %R::TYPE, sequence = ?digit, len = wire.len(), "Encoded request");

    Ok(wire)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Y" } else { "N" }
}

fn optional_yes_no(flag: Option<bool>) -> &'static str {
    flag.map(yes_no).unwrap_or("")
}

fn optional_date(at: Option<NaiveDateTime>) -> String {
    at.map(timestamp::format).unwrap_or_default()
}

fn optional_number(n: Option<u32>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

/// Login (93)
#[derive(Debug, Clone, Default)]
pub struct Login {
    pub user: String,
    pub password: String,
}

impl Request for Login {
    const TYPE: MessageType = MessageType::Login;
    const RESPONSE: Option<MessageType> = Some(MessageType::LoginResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&config.uid_algorithm.to_string(), 1)?;
        b.add_fixed(&config.pwd_algorithm.to_string(), 1)?;
        b.add_variable(fields::LOGIN_USER_ID, &self.user, false);
        b.add_variable(fields::LOGIN_PASSWORD, &self.password, false);
        b.add_variable(fields::LOCATION_CODE, &config.location, true);
        Ok(())
    }
}

/// SC status (99)
#[derive(Debug, Clone)]
pub struct ScStatus {
    /// 0 = OK, 1 = printer out of paper, 2 = about to shut down
    pub status: u8,
    pub max_print_width: u16,
    /// Protocol major version, 1 or 2
    pub protocol_version: u8,
}

impl Default for ScStatus {
    fn default() -> Self {
        Self {
            status: 0,
            max_print_width: 80,
            protocol_version: 2,
        }
    }
}

impl Request for ScStatus {
    const TYPE: MessageType = MessageType::ScStatus;
    const RESPONSE: Option<MessageType> = Some(MessageType::AcsStatus);

    fn encode(&self, b: &mut MessageBuilder, _config: &ProtocolConfig) -> Result<()> {
        if self.status > 2 {
            return Err(Error::validation(
                "status code",
                format!("must be 0, 1 or 2, got {}", self.status),
            ));
        }
        if self.max_print_width > 999 {
            return Err(Error::validation(
                "max print width",
                format!("must fit in 3 digits, got {}", self.max_print_width),
            ));
        }
        if !(1..=2).contains(&self.protocol_version) {
            return Err(Error::validation(
                "protocol version",
                format!("must be 1 or 2, got {}", self.protocol_version),
            ));
        }

        b.add_fixed(&self.status.to_string(), 1)?;
        b.add_fixed(&self.max_print_width.to_string(), 3)?;
        b.add_fixed(&format!("{}.00", self.protocol_version), 4)?;
        Ok(())
    }
}

/// Ask the ACS to resend its last message (97)
///
/// Never carries a sequence field.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestResend;

impl Request for RequestResend {
    const TYPE: MessageType = MessageType::RequestAcsResend;
    const RESPONSE: Option<MessageType> = None;

    fn encode(&self, _b: &mut MessageBuilder, _config: &ProtocolConfig) -> Result<()> {
        Ok(())
    }

    fn trailer(&self, config: &ProtocolConfig) -> Trailer {
        Trailer::from_config(config).without_sequence()
    }
}

/// Patron status (23)
#[derive(Debug, Clone, Default)]
pub struct PatronStatus {
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for PatronStatus {
    const TYPE: MessageType = MessageType::PatronStatusRequest;
    const RESPONSE: Option<MessageType> = Some(MessageType::PatronStatusResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&config.language, 3)?;
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, false);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, false);
        Ok(())
    }
}

/// Patron information (63)
#[derive(Debug, Clone, Default)]
pub struct PatronInformation {
    pub summary: SummaryType,
    /// First item of the summary list (1-based)
    pub start_item: Option<u32>,
    /// Last item of the summary list
    pub end_item: Option<u32>,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for PatronInformation {
    const TYPE: MessageType = MessageType::PatronInformation;
    const RESPONSE: Option<MessageType> = Some(MessageType::PatronInformationResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&config.language, 3)?;
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_fixed(&self.summary.field(), SummaryType::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        b.add_variable(fields::START_ITEM, &optional_number(self.start_item), true);
        b.add_variable(fields::END_ITEM, &optional_number(self.end_item), true);
        Ok(())
    }
}

/// Checkout (11)
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    pub item: String,
    pub item_properties: String,
    /// Terminal allows renewing an item the patron already has
    pub sc_renewal: bool,
    /// Transaction happened offline and must not be blocked
    pub no_block: bool,
    pub nb_due_date: Option<NaiveDateTime>,
    pub fee_acknowledged: Option<bool>,
    pub cancel: Option<bool>,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for Checkout {
    const TYPE: MessageType = MessageType::Checkout;
    const RESPONSE: Option<MessageType> = Some(MessageType::CheckoutResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(yes_no(self.sc_renewal), 1)?;
        b.add_fixed(yes_no(self.no_block), 1)?;
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_fixed(&optional_date(self.nb_due_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::ITEM_IDENTIFIER, &self.item, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, false);
        b.add_variable(fields::ITEM_PROPERTIES, &self.item_properties, true);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        b.add_variable(fields::FEE_ACKNOWLEDGED, optional_yes_no(self.fee_acknowledged), true);
        b.add_variable(fields::CANCEL, optional_yes_no(self.cancel), true);
        Ok(())
    }
}

/// Checkin (09)
#[derive(Debug, Clone, Default)]
pub struct Checkin {
    pub item: String,
    /// Where the item was returned (`AP`); empty means the terminal
    /// location from the config
    pub location: String,
    pub item_properties: String,
    pub no_block: bool,
    /// Defaults to the transaction date
    pub return_date: Option<NaiveDateTime>,
    pub cancel: Option<bool>,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for Checkin {
    const TYPE: MessageType = MessageType::Checkin;
    const RESPONSE: Option<MessageType> = Some(MessageType::CheckinResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        let now = timestamp::or_now(self.transaction_date);
        let returned = self.return_date.map(timestamp::format).unwrap_or_else(|| now.clone());

        let location = if self.location.is_empty() {
            &config.location
        } else {
            &self.location
        };

        b.add_fixed(yes_no(self.no_block), 1)?;
        b.add_fixed(&now, timestamp::WIDTH)?;
        b.add_fixed(&returned, timestamp::WIDTH)?;
        b.add_variable(fields::CURRENT_LOCATION, location, false);
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::ITEM_IDENTIFIER, &self.item, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, false);
        b.add_variable(fields::ITEM_PROPERTIES, &self.item_properties, true);
        b.add_variable(fields::CANCEL, optional_yes_no(self.cancel), true);
        Ok(())
    }
}

/// Block patron (01)
///
/// The ACS does not answer this message.
#[derive(Debug, Clone, Default)]
pub struct BlockPatron {
    pub message: String,
    pub card_retained: bool,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for BlockPatron {
    const TYPE: MessageType = MessageType::BlockPatron;
    const RESPONSE: Option<MessageType> = None;
    const EXPECTS_REPLY: bool = false;

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(yes_no(self.card_retained), 1)?;
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::BLOCKED_CARD_MESSAGE, &self.message, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, false);
        Ok(())
    }
}

/// End patron session (35)
#[derive(Debug, Clone, Default)]
pub struct EndPatronSession {
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for EndPatronSession {
    const TYPE: MessageType = MessageType::EndPatronSession;
    const RESPONSE: Option<MessageType> = Some(MessageType::EndSessionResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        Ok(())
    }
}

/// Fee paid (37)
#[derive(Debug, Clone, Default)]
pub struct FeePaid {
    /// 01..=99, e.g. 01 other, 04 overdue, 05 processing
    pub fee_type: u8,
    /// 00..=99, e.g. 00 cash, 01 VISA, 02 credit card
    pub payment_type: u8,
    pub amount: String,
    pub fee_id: String,
    pub transaction_id: String,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for FeePaid {
    const TYPE: MessageType = MessageType::FeePaid;
    const RESPONSE: Option<MessageType> = Some(MessageType::FeePaidResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        if !(1..=99).contains(&self.fee_type) {
            return Err(Error::validation(
                "fee type",
                format!("must be between 01 and 99, got {}", self.fee_type),
            ));
        }
        if self.payment_type > 99 {
            return Err(Error::validation(
                "payment type",
                format!("must be between 00 and 99, got {}", self.payment_type),
            ));
        }

        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_fixed(&format!("{:02}", self.fee_type), 2)?;
        b.add_fixed(&format!("{:02}", self.payment_type), 2)?;
        b.add_fixed(&config.currency, 3)?;
        b.add_variable(fields::FEE_AMOUNT, &self.amount, false);
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        b.add_variable(fields::FEE_IDENTIFIER, &self.fee_id, true);
        b.add_variable(fields::TRANSACTION_ID, &self.transaction_id, true);
        Ok(())
    }
}

/// Item information (17)
#[derive(Debug, Clone, Default)]
pub struct ItemInformation {
    pub item: String,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for ItemInformation {
    const TYPE: MessageType = MessageType::ItemInformation;
    const RESPONSE: Option<MessageType> = Some(MessageType::ItemInformationResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::ITEM_IDENTIFIER, &self.item, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        Ok(())
    }
}

/// Item status update (19)
#[derive(Debug, Clone, Default)]
pub struct ItemStatusUpdate {
    pub item: String,
    pub item_properties: String,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for ItemStatusUpdate {
    const TYPE: MessageType = MessageType::ItemStatusUpdate;
    const RESPONSE: Option<MessageType> = Some(MessageType::ItemStatusUpdateResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::ITEM_IDENTIFIER, &self.item, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::ITEM_PROPERTIES, &self.item_properties, false);
        Ok(())
    }
}

/// Patron enable (25)
#[derive(Debug, Clone, Default)]
pub struct PatronEnable {
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for PatronEnable {
    const TYPE: MessageType = MessageType::PatronEnable;
    const RESPONSE: Option<MessageType> = Some(MessageType::PatronEnableResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        Ok(())
    }
}

/// Hold (15)
#[derive(Debug, Clone, Default)]
pub struct Hold {
    pub mode: HoldMode,
    pub expiration_date: Option<NaiveDateTime>,
    pub pickup_location: String,
    /// 1..=9, see [`HoldType`]
    pub hold_type: Option<u8>,
    pub item: String,
    pub title: String,
    pub fee_acknowledged: Option<bool>,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Hold {
    /// Start a hold from its wire marker (`+`, `-` or `*`)
    pub fn from_marker(marker: char) -> Result<Self> {
        Ok(Self {
            mode: HoldMode::try_from(marker)?,
            ..Self::default()
        })
    }
}

impl Request for Hold {
    const TYPE: MessageType = MessageType::Hold;
    const RESPONSE: Option<MessageType> = Some(MessageType::HoldResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        let hold_type = self.hold_type.map(HoldType::new).transpose()?;

        b.add_fixed(&self.mode.to_string(), 1)?;
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::EXPIRATION_DATE, &optional_date(self.expiration_date), true);
        b.add_variable(fields::PICKUP_LOCATION, &self.pickup_location, true);
        b.add_variable(
            fields::HOLD_TYPE,
            &hold_type.map(|t| t.to_string()).unwrap_or_default(),
            true,
        );
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        b.add_variable(fields::ITEM_IDENTIFIER, &self.item, true);
        b.add_variable(fields::TITLE_IDENTIFIER, &self.title, true);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::FEE_ACKNOWLEDGED, optional_yes_no(self.fee_acknowledged), true);
        Ok(())
    }
}

/// Renew (29)
#[derive(Debug, Clone, Default)]
pub struct Renew {
    pub item: String,
    pub title: String,
    pub item_properties: String,
    pub third_party: bool,
    pub no_block: bool,
    pub nb_due_date: Option<NaiveDateTime>,
    pub fee_acknowledged: Option<bool>,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for Renew {
    const TYPE: MessageType = MessageType::Renew;
    const RESPONSE: Option<MessageType> = Some(MessageType::RenewResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(yes_no(self.third_party), 1)?;
        b.add_fixed(yes_no(self.no_block), 1)?;
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_fixed(&optional_date(self.nb_due_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        b.add_variable(fields::ITEM_IDENTIFIER, &self.item, true);
        b.add_variable(fields::TITLE_IDENTIFIER, &self.title, true);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::ITEM_PROPERTIES, &self.item_properties, true);
        b.add_variable(fields::FEE_ACKNOWLEDGED, optional_yes_no(self.fee_acknowledged), true);
        Ok(())
    }
}

/// Renew all (65)
#[derive(Debug, Clone, Default)]
pub struct RenewAll {
    pub fee_acknowledged: Option<bool>,
    pub transaction_date: Option<NaiveDateTime>,
}

impl Request for RenewAll {
    const TYPE: MessageType = MessageType::RenewAll;
    const RESPONSE: Option<MessageType> = Some(MessageType::RenewAllResponse);

    fn encode(&self, b: &mut MessageBuilder, config: &ProtocolConfig) -> Result<()> {
        b.add_fixed(&timestamp::or_now(self.transaction_date), timestamp::WIDTH)?;
        b.add_variable(fields::INSTITUTION_ID, &config.institution, false);
        b.add_variable(fields::PATRON_IDENTIFIER, &config.patron, false);
        b.add_variable(fields::PATRON_PASSWORD, &config.patron_password, true);
        b.add_variable(fields::TERMINAL_PASSWORD, &config.terminal_password, true);
        b.add_variable(fields::FEE_ACKNOWLEDGED, optional_yes_no(self.fee_acknowledged), true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const DATE: &str = "20240102    030405";

    fn date() -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5)
    }

    fn config() -> ProtocolConfig {
        ProtocolConfig::new("localhost", 6001)
            .with_institution("MAIN")
            .with_terminal_password("tpw")
            .with_patron("P1", "ppw")
            .with_checksum(false)
            .with_sequence(false)
    }

    fn text<R: Request>(request: &R, config: &ProtocolConfig) -> String {
        let mut seq = SequenceCounter::new();
        encode(request, config, &mut seq).unwrap().text().into_owned()
    }

    #[test]
    fn test_login() {
        let login = Login {
            user: "sc".into(),
            password: "pw".into(),
        };
        assert_eq!(text(&login, &config()), "9300CNsc|COpw|");

        let located = config().with_location("LOC");
        assert_eq!(text(&login, &located), "9300CNsc|COpw|CPLOC|");
    }

    #[test]
    fn test_sc_status() {
        let status = ScStatus::default();
        assert_eq!(text(&status, &config()), "990 802.00");

        let status = ScStatus {
            status: 1,
            max_print_width: 40,
            protocol_version: 1,
        };
        assert_eq!(text(&status, &config()), "991 401.00");
    }

    #[test]
    fn test_sc_status_invalid_emits_nothing() {
        let mut seq = SequenceCounter::new();
        let status = ScStatus {
            status: 3,
            ..ScStatus::default()
        };
        let err = encode(&status, &ProtocolConfig::default(), &mut seq).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(seq.peek(), 0);

        let version = ScStatus {
            protocol_version: 3,
            ..ScStatus::default()
        };
        assert!(encode(&version, &ProtocolConfig::default(), &mut seq).is_err());
    }

    #[test]
    fn test_request_resend_never_sequenced() {
        let mut seq = SequenceCounter::new();
        let config = ProtocolConfig::default();
        let wire = encode(&RequestResend, &config, &mut seq).unwrap();

        assert_eq!(wire.text(), "97AZFEF5");
        assert_eq!(seq.peek(), 0);
    }

    #[test]
    fn test_trailers_consume_sequence() {
        let mut seq = SequenceCounter::new();
        let config = config().with_sequence(true).with_checksum(true);

        let first = encode(&ScStatus::default(), &config, &mut seq).unwrap();
        let second = encode(&ScStatus::default(), &config, &mut seq).unwrap();

        assert!(first.text().starts_with("990 802.00AY0AZ"));
        assert!(second.text().starts_with("990 802.00AY1AZ"));
        assert!(checksum::verify(second.as_bytes(), b'\r'));
    }

    #[test]
    fn test_patron_status() {
        let req = PatronStatus {
            transaction_date: date(),
        };
        assert_eq!(
            text(&req, &config()),
            format!("23001{}AOMAIN|AAP1|ACtpw|ADppw|", DATE)
        );
    }

    #[test]
    fn test_patron_status_sends_empty_required_fields() {
        let req = PatronStatus {
            transaction_date: date(),
        };
        let config = config().with_patron("P1", "").with_terminal_password("");
        assert_eq!(
            text(&req, &config),
            format!("23001{}AOMAIN|AAP1|AC|AD|", DATE)
        );
    }

    #[test]
    fn test_patron_information() {
        let req = PatronInformation {
            summary: SummaryType::Charged,
            start_item: Some(1),
            end_item: Some(5),
            transaction_date: date(),
        };
        assert_eq!(
            text(&req, &config()),
            format!("63001{}  Y       AOMAIN|AAP1|ACtpw|ADppw|BP1|BQ5|", DATE)
        );
    }

    #[test]
    fn test_checkout() {
        let req = Checkout {
            item: "I42".into(),
            fee_acknowledged: Some(true),
            transaction_date: date(),
            ..Checkout::default()
        };
        assert_eq!(
            text(&req, &config()),
            format!(
                "11NN{}{}AOMAIN|AAP1|ABI42|ACtpw|ADppw|BOY|",
                DATE,
                " ".repeat(18)
            )
        );
    }

    #[test]
    fn test_checkout_nb_due_date() {
        let req = Checkout {
            item: "I42".into(),
            sc_renewal: true,
            nb_due_date: date(),
            transaction_date: date(),
            ..Checkout::default()
        };
        let text = text(&req, &config());
        assert!(text.starts_with(&format!("11YN{}{}AO", DATE, DATE)));
    }

    #[test]
    fn test_checkin() {
        let req = Checkin {
            item: "I42".into(),
            location: "DESK".into(),
            cancel: Some(false),
            transaction_date: date(),
            ..Checkin::default()
        };
        assert_eq!(
            text(&req, &config()),
            format!("09N{}{}APDESK|AOMAIN|ABI42|ACtpw|BIN|", DATE, DATE)
        );
    }

    #[test]
    fn test_checkin_location_falls_back_to_terminal() {
        let req = Checkin {
            item: "I42".into(),
            transaction_date: date(),
            ..Checkin::default()
        };
        let located = config().with_location("BRANCH1");
        assert_eq!(
            text(&req, &located),
            format!("09N{}{}APBRANCH1|AOMAIN|ABI42|ACtpw|", DATE, DATE)
        );

        // Without a terminal location the required field goes out empty
        assert_eq!(
            text(&req, &config()),
            format!("09N{}{}AP|AOMAIN|ABI42|ACtpw|", DATE, DATE)
        );
    }

    #[test]
    fn test_printable_message_terminator_round_trips() {
        let mut seq = SequenceCounter::new();
        let config = ProtocolConfig::default().with_terminators(b'|', b'~');
        let wire = encode(&ScStatus::default(), &config, &mut seq).unwrap();

        assert_eq!(wire.as_bytes().last(), Some(&b'~'));
        assert!(config.verify_checksum(wire.as_bytes()));
    }

    #[test]
    fn test_block_patron() {
        let req = BlockPatron {
            message: "Card left in reader".into(),
            card_retained: true,
            transaction_date: date(),
        };
        assert_eq!(
            text(&req, &config()),
            format!("01Y{}AOMAIN|ALCard left in reader|AAP1|ACtpw|", DATE)
        );
    }

    #[test]
    fn test_end_patron_session() {
        let req = EndPatronSession {
            transaction_date: date(),
        };
        let config = config().with_patron("P1", "");
        assert_eq!(
            text(&req, &config),
            format!("35{}AOMAIN|AAP1|ACtpw|", DATE)
        );
    }

    #[test]
    fn test_fee_paid() {
        let req = FeePaid {
            fee_type: 4,
            payment_type: 0,
            amount: "2.50".into(),
            fee_id: "F9".into(),
            transaction_date: date(),
            ..FeePaid::default()
        };
        assert_eq!(
            text(&req, &config()),
            format!("37{}0400USDBV2.50|AOMAIN|AAP1|ACtpw|ADppw|CGF9|", DATE)
        );
    }

    #[test]
    fn test_fee_paid_validation() {
        let mut seq = SequenceCounter::new();
        for (fee_type, payment_type) in [(0, 0), (100, 0), (1, 100)] {
            let req = FeePaid {
                fee_type,
                payment_type,
                ..FeePaid::default()
            };
            let err = encode(&req, &config(), &mut seq).unwrap_err();
            assert!(err.is_validation(), "{:?}", err);
        }
    }

    #[test]
    fn test_item_information() {
        let req = ItemInformation {
            item: "I42".into(),
            transaction_date: date(),
        };
        let config = config().with_terminal_password("");
        assert_eq!(text(&req, &config), format!("17{}AOMAIN|ABI42|", DATE));
    }

    #[test]
    fn test_item_status_update() {
        let req = ItemStatusUpdate {
            item: "I42".into(),
            item_properties: "shelf 3".into(),
            transaction_date: date(),
        };
        assert_eq!(
            text(&req, &config()),
            format!("19{}AOMAIN|ABI42|ACtpw|CHshelf 3|", DATE)
        );
    }

    #[test]
    fn test_patron_enable() {
        let req = PatronEnable {
            transaction_date: date(),
        };
        assert_eq!(
            text(&req, &config()),
            format!("25{}AOMAIN|AAP1|ACtpw|ADppw|", DATE)
        );
    }

    #[test]
    fn test_hold() {
        let req = Hold {
            mode: HoldMode::Add,
            pickup_location: "BR2".into(),
            hold_type: Some(2),
            title: "T1".into(),
            transaction_date: date(),
            ..Hold::default()
        };
        assert_eq!(
            text(&req, &config()),
            format!("15+{}BSBR2|BY2|AOMAIN|AAP1|ADppw|AJT1|ACtpw|", DATE)
        );
    }

    #[test]
    fn test_hold_validation() {
        assert!(Hold::from_marker('?').unwrap_err().is_validation());
        assert_eq!(Hold::from_marker('-').unwrap().mode, HoldMode::Delete);

        let mut seq = SequenceCounter::new();
        let req = Hold {
            hold_type: Some(0),
            ..Hold::default()
        };
        assert!(encode(&req, &config(), &mut seq).unwrap_err().is_validation());
    }

    #[test]
    fn test_renew() {
        let req = Renew {
            item: "I42".into(),
            third_party: true,
            transaction_date: date(),
            ..Renew::default()
        };
        assert_eq!(
            text(&req, &config()),
            format!(
                "29YN{}{}AOMAIN|AAP1|ADppw|ABI42|ACtpw|",
                DATE,
                " ".repeat(18)
            )
        );
    }

    #[test]
    fn test_renew_all() {
        let req = RenewAll {
            fee_acknowledged: Some(false),
            transaction_date: date(),
        };
        assert_eq!(
            text(&req, &config()),
            format!("65{}AOMAIN|AAP1|ADppw|ACtpw|BON|", DATE)
        );
    }

    #[test]
    fn test_long_values_truncated() {
        let req = ItemInformation {
            item: "x".repeat(400),
            transaction_date: date(),
        };
        let text = text(&req, &config());
        let item = text
            .split('|')
            .find(|t| t.starts_with("AB"))
            .unwrap();
        assert_eq!(item.len(), 2 + 255);
    }
}
