//! Inbound response decoding
//!
//! A response is a run of fixed fields at message-type specific offsets,
//! followed by delimited variable fields and the optional checksum trailer:
//!
//! ```text
//! 64              00120240101    120000000200000001...AOinst|AApatron|AY1AZE0C4
//! ^^ fixed fields at known offsets ^^^^^^^^^^^^^^^^^   ^ variable region   ^^^^^^
//!                                                                         AZ + 4
//! ```

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::{
    config::{Framing, ProtocolConfig},
    constants::{fields, CHECKSUM_DIGITS, CHECKSUM_FIELD_LEN},
    message_type::MessageType,
};

/// How a fixed field is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept as-is
    Text,
    /// Decimal count; anything non-numeric decodes as 0
    Count,
}

/// Position of one fixed field in a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

const fn text(name: &'static str, offset: usize, width: usize) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width,
        kind: FieldKind::Text,
    }
}

const fn count(name: &'static str, offset: usize, width: usize) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width,
        kind: FieldKind::Count,
    }
}

/// Fixed layout and variable region start of one response type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub fixed: &'static [FieldSpec],
    pub variable_offset: usize,
}

/// Layout used for codes with no known structure
pub const UNKNOWN_LAYOUT: Layout = Layout {
    fixed: &[],
    variable_offset: 2,
};

const LOGIN: Layout = Layout {
    fixed: &[text("Ok", 2, 1)],
    variable_offset: 3,
};

const ACS_STATUS: Layout = Layout {
    fixed: &[
        text("Online", 2, 1),
        text("Checkin", 3, 1),
        text("Checkout", 4, 1),
        text("Renewal", 5, 1),
        text("PatronUpdate", 6, 1),
        text("Offline", 7, 1),
        text("Timeout", 8, 3),
        text("Retries", 11, 3),
        text("TransactionDate", 14, 18),
        text("Protocol", 32, 4),
    ],
    variable_offset: 36,
};

const PATRON_STATUS: Layout = Layout {
    fixed: &[
        text("PatronStatus", 2, 14),
        text("Language", 16, 3),
        text("TransactionDate", 19, 18),
    ],
    variable_offset: 37,
};

const PATRON_INFORMATION: Layout = Layout {
    fixed: &[
        text("PatronStatus", 2, 14),
        text("Language", 16, 3),
        text("TransactionDate", 19, 18),
        count("HoldCount", 37, 4),
        count("OverdueCount", 41, 4),
        count("ChargedCount", 45, 4),
        count("FineCount", 49, 4),
        count("RecallCount", 53, 4),
        count("UnavailableCount", 57, 4),
    ],
    variable_offset: 61,
};

const CHECKOUT: Layout = Layout {
    fixed: &[
        text("Ok", 2, 1),
        text("RenewalOk", 3, 1),
        text("Magnetic", 4, 1),
        text("Desensitize", 5, 1),
        text("TransactionDate", 6, 18),
    ],
    variable_offset: 24,
};

const CHECKIN: Layout = Layout {
    fixed: &[
        text("Ok", 2, 1),
        text("Resensitize", 3, 1),
        text("Magnetic", 4, 1),
        text("Alert", 5, 1),
        text("TransactionDate", 6, 18),
    ],
    variable_offset: 24,
};

const END_SESSION: Layout = Layout {
    fixed: &[text("EndSession", 2, 1), text("TransactionDate", 3, 18)],
    variable_offset: 21,
};

const FEE_PAID: Layout = Layout {
    fixed: &[text("PaymentAccepted", 2, 1), text("TransactionDate", 3, 18)],
    variable_offset: 21,
};

const ITEM_INFORMATION: Layout = Layout {
    fixed: &[
        text("CirculationStatus", 2, 2),
        text("SecurityMarker", 4, 2),
        text("FeeType", 6, 2),
        text("TransactionDate", 8, 18),
    ],
    variable_offset: 26,
};

const ITEM_STATUS_UPDATE: Layout = Layout {
    fixed: &[text("PropertiesOk", 2, 1), text("TransactionDate", 3, 18)],
    variable_offset: 21,
};

const HOLD: Layout = Layout {
    fixed: &[
        text("Ok", 2, 1),
        text("Available", 3, 1),
        text("TransactionDate", 4, 18),
    ],
    variable_offset: 22,
};

const RENEW: Layout = Layout {
    fixed: &[
        text("Ok", 2, 1),
        text("RenewalOk", 3, 1),
        text("Magnetic", 4, 1),
        text("Desensitize", 5, 1),
        text("TransactionDate", 6, 18),
    ],
    variable_offset: 24,
};

const RENEW_ALL: Layout = Layout {
    fixed: &[
        text("Ok", 2, 1),
        count("Renewed", 3, 4),
        count("Unrenewed", 7, 4),
        text("TransactionDate", 11, 18),
    ],
    variable_offset: 29,
};

/// Layout for a response type; requests have none
pub fn layout(message_type: MessageType) -> Option<&'static Layout> {
    let layout = match message_type {
        MessageType::LoginResponse => &LOGIN,
        MessageType::AcsStatus => &ACS_STATUS,
        MessageType::PatronStatusResponse | MessageType::PatronEnableResponse => &PATRON_STATUS,
        MessageType::PatronInformationResponse => &PATRON_INFORMATION,
        MessageType::CheckoutResponse => &CHECKOUT,
        MessageType::CheckinResponse => &CHECKIN,
        MessageType::EndSessionResponse => &END_SESSION,
        MessageType::FeePaidResponse => &FEE_PAID,
        MessageType::ItemInformationResponse => &ITEM_INFORMATION,
        MessageType::ItemStatusUpdateResponse => &ITEM_STATUS_UPDATE,
        MessageType::HoldResponse => &HOLD,
        MessageType::RenewResponse => &RENEW,
        MessageType::RenewAllResponse => &RENEW_ALL,
        MessageType::RequestScResend => &UNKNOWN_LAYOUT,
        _ => return None,
    };
    Some(layout)
}

/// Strip whitespace, control bytes and `terminator` from both ends of a
/// message
pub fn trim_message(message: &[u8], terminator: u8) -> &[u8] {
    let keep = |b: u8| b > b' ' && b != terminator;
    let start = message
        .iter()
        .position(|&b| keep(b))
        .unwrap_or(message.len());
    let end = message
        .iter()
        .rposition(|&b| keep(b))
        .map_or(start, |i| i + 1);
    &message[start..end]
}

fn strip_control(value: &[u8]) -> &[u8] {
    let start = value
        .iter()
        .position(|&b| b >= 0x20)
        .unwrap_or(value.len());
    let end = value
        .iter()
        .rposition(|&b| b >= 0x20)
        .map_or(start, |i| i + 1);
    &value[start..end]
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decoded fixed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedValue {
    Text(String),
    Count(u32),
}

impl FixedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Count(_) => None,
        }
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FixedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Extract fixed fields by offset
///
/// Fields running past the end of a short response yield whatever bytes
/// exist, possibly none.
pub fn parse_fixed(response: &[u8], layout: &[FieldSpec]) -> BTreeMap<&'static str, FixedValue> {
    layout
        .iter()
        .map(|field| {
            let bytes = response
                .get(field.offset..)
                .map(|rest| &rest[..rest.len().min(field.width)])
                .unwrap_or(&[]);

            let value = match field.kind {
                FieldKind::Text => FixedValue::Text(lossy(bytes)),
                FieldKind::Count => FixedValue::Count(
                    String::from_utf8_lossy(bytes).trim().parse().unwrap_or(0),
                ),
            };

            (field.name, value)
        })
        .collect()
}

/// Variable region of a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableFields {
    /// Tokens as split, before decoding
    pub raw: Vec<String>,
    /// Decoded values per field code, in encounter order
    pub fields: BTreeMap<String, Vec<String>>,
    /// Trailing checksum digits, when checksums are enabled
    pub checksum: Option<String>,
}

/// Split the variable region of a response into fields
///
/// With checksums enabled the last six bytes (`AZ` + four digits) are
/// excluded from the region and the digits are reported separately.
pub fn parse_variable(response: &[u8], start: usize, framing: Framing) -> VariableFields {
    let response = trim_message(response, framing.message_terminator);

    let (end, checksum) = if framing.checksum {
        let digits = &response[response.len().saturating_sub(CHECKSUM_DIGITS)..];
        (
            response.len().saturating_sub(CHECKSUM_FIELD_LEN),
            Some(lossy(digits)),
        )
    } else {
        (response.len(), None)
    };

    let region = response.get(start..end).unwrap_or(&[]);

    let mut tokens: Vec<&[u8]> = region.split(|&b| b == framing.field_terminator).collect();
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    let mut result = VariableFields {
        checksum: checksum.clone(),
        ..VariableFields::default()
    };

    for token in tokens {
        result.raw.push(lossy(token));

        let split = token.len().min(2);
        let (code, value) = token.split_at(split);
        let value = strip_control(value);

        if !value.is_empty() {
            result
                .fields
                .entry(lossy(code))
                .or_default()
                .push(lossy(value));
        }
    }

    if let Some(cs) = checksum {
        result
            .fields
            .entry(fields::CHECKSUM.to_string())
            .or_default()
            .push(cs);
    }

    result
}

/// A fully decoded response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    code: String,
    message_type: Option<MessageType>,
    fixed: BTreeMap<&'static str, FixedValue>,
    variable: VariableFields,
}

impl ParsedResponse {
    /// Decode a response using the layout of its own message code
    pub fn parse(message: &[u8], config: &ProtocolConfig) -> Self {
        let trimmed = trim_message(message, config.message_terminator);
        let message_type = MessageType::of_message(trimmed);
        let layout = message_type.and_then(layout).unwrap_or(&UNKNOWN_LAYOUT);

        Self::parse_with(message, layout, config.framing())
    }

    /// Decode a response with an explicit layout
    pub fn parse_with(message: &[u8], layout: &Layout, framing: Framing) -> Self {
        let trimmed = trim_message(message, framing.message_terminator);
        let code = lossy(&trimmed[..trimmed.len().min(2)]);

        let parsed = Self {
            message_type: MessageType::try_from(code.as_str()).ok(),
            code,
            fixed: parse_fixed(trimmed, layout.fixed),
            variable: parse_variable(trimmed, layout.variable_offset, framing),
        };

        trace!(
            code = %parsed.code,
            fixed = parsed.fixed.len(),
            tokens = parsed.variable.raw.len(),
            "Parsed response"
        );

        parsed
    }

    /// Two-character code as received
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.message_type
    }

    pub fn fixed(&self, name: &str) -> Option<&FixedValue> {
        self.fixed.get(name)
    }

    /// Text of a fixed field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fixed(name).and_then(FixedValue::as_text)
    }

    /// Value of a count field
    pub fn count(&self, name: &str) -> Option<u32> {
        self.fixed(name).and_then(FixedValue::as_count)
    }

    pub fn fixed_fields(&self) -> &BTreeMap<&'static str, FixedValue> {
        &self.fixed
    }

    /// First decoded value of a variable field
    pub fn field(&self, code: &str) -> Option<&str> {
        self.fields(code).first().map(String::as_str)
    }

    /// All decoded values of a variable field
    pub fn fields(&self, code: &str) -> &[String] {
        self.variable
            .fields
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn variable_fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.variable.fields
    }

    /// Raw tokens of the variable region
    pub fn raw(&self) -> &[String] {
        &self.variable.raw
    }

    /// Checksum digits the peer sent
    pub fn checksum(&self) -> Option<&str> {
        self.variable.checksum.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum;
    use pretty_assertions::assert_eq;

    fn signed(body: &str) -> Vec<u8> {
        let mut message = format!("{}AZ", body);
        message.push_str(&checksum::calculate(message.as_bytes()));
        message.push('\r');
        message.into_bytes()
    }

    fn framing(checksum: bool) -> Framing {
        Framing {
            checksum,
            ..Framing::default()
        }
    }

    #[test]
    fn test_trim_message() {
        assert_eq!(trim_message(b"\n 94 1\r\n", b'\r'), b"94 1");
        assert_eq!(trim_message(b"\r\n", b'\r'), b"");
        assert_eq!(trim_message(b"", b'\r'), b"");
        assert_eq!(trim_message(b"941~", b'~'), b"941");
        assert_eq!(trim_message(b"941~", b'\r'), b"941~");
    }

    #[test]
    fn test_parse_variable_with_checksum() {
        let vars = parse_variable(b"AOWOHLERS|AAX00000000|AY9AZF474", 0, framing(true));

        assert_eq!(vars.raw, vec!["AOWOHLERS", "AAX00000000", "AY9"]);
        assert_eq!(vars.fields["AO"], vec!["WOHLERS"]);
        assert_eq!(vars.fields["AA"], vec!["X00000000"]);
        assert_eq!(vars.fields["AY"], vec!["9"]);
        assert_eq!(vars.fields["AZ"], vec!["F474"]);
        assert_eq!(vars.checksum.as_deref(), Some("F474"));
    }

    #[test]
    fn test_parse_variable_without_checksum() {
        let vars = parse_variable(b"AOWOHLERS|AAX00000000|\r", 0, framing(false));

        assert_eq!(vars.raw, vec!["AOWOHLERS", "AAX00000000"]);
        assert!(!vars.fields.contains_key("AZ"));
        assert!(vars.checksum.is_none());
    }

    #[test]
    fn test_parse_variable_repeated_codes() {
        let vars = parse_variable(b"ASitem1|ASitem2|AFhi|ASitem3|", 0, framing(false));
        assert_eq!(vars.fields["AS"], vec!["item1", "item2", "item3"]);
    }

    #[test]
    fn test_parse_variable_strips_control_bytes() {
        let vars = parse_variable(b"AF\x01hello\x00|AG\x02|AHx|", 0, framing(false));

        assert_eq!(vars.fields["AF"], vec!["hello"]);
        assert!(!vars.fields.contains_key("AG"));
        // Dropped values still appear in the raw tokens
        assert_eq!(vars.raw, vec!["AF\u{1}hello\u{0}", "AG\u{2}", "AHx"]);
    }

    #[test]
    fn test_parse_variable_offset_past_end() {
        let vars = parse_variable(b"94", 3, framing(true));
        assert!(vars.raw.is_empty());
        assert_eq!(vars.checksum.as_deref(), Some("94"));
    }

    #[test]
    fn test_parse_fixed_short_response() {
        let fixed = parse_fixed(b"12", CHECKOUT.fixed);
        assert_eq!(fixed["Ok"], FixedValue::Text(String::new()));
        assert_eq!(fixed["TransactionDate"], FixedValue::Text(String::new()));
    }

    #[test]
    fn test_parse_login_response() {
        let config = ProtocolConfig::default();
        let parsed = ParsedResponse::parse(&signed("941AY0"), &config);

        assert_eq!(parsed.code(), "94");
        assert_eq!(parsed.message_type(), Some(MessageType::LoginResponse));
        assert_eq!(parsed.text("Ok"), Some("1"));
        assert_eq!(parsed.field("AY"), Some("0"));
        assert!(parsed.checksum().is_some());
    }

    #[test]
    fn test_parse_patron_information() {
        let body = concat!(
            "64",
            "  Y           ",
            "001",
            "20240101    120000",
            "0002", "0000", "0011", "0000", "0000", "00x0",
            "AOinst|AAP0001|AEJohn Doe|ASbook1|ASbook2|AY1"
        );
        let config = ProtocolConfig::default();
        let parsed = ParsedResponse::parse(&signed(body), &config);

        assert_eq!(parsed.message_type(), Some(MessageType::PatronInformationResponse));
        assert_eq!(parsed.text("PatronStatus"), Some("  Y           "));
        assert_eq!(parsed.text("Language"), Some("001"));
        assert_eq!(parsed.text("TransactionDate"), Some("20240101    120000"));
        assert_eq!(parsed.count("HoldCount"), Some(2));
        assert_eq!(parsed.count("ChargedCount"), Some(11));
        assert_eq!(parsed.count("UnavailableCount"), Some(0));
        assert_eq!(parsed.field("AE"), Some("John Doe"));
        assert_eq!(parsed.fields("AS"), ["book1", "book2"]);
        assert_eq!(parsed.raw()[0], "AOinst");
    }

    #[test]
    fn test_parse_acs_status() {
        let body = "98YYYNYN00500320240101    1200002.00AOinst|AMMain Library|BXYYYYYYYYYYYYYYYY|AY2";
        let config = ProtocolConfig::default().with_checksum(true);
        let parsed = ParsedResponse::parse(&signed(body), &config);

        assert_eq!(parsed.text("Online"), Some("Y"));
        assert_eq!(parsed.text("Renewal"), Some("N"));
        assert_eq!(parsed.text("Timeout"), Some("005"));
        assert_eq!(parsed.text("Retries"), Some("003"));
        assert_eq!(parsed.text("Protocol"), Some("2.00"));
        assert_eq!(parsed.field("AM"), Some("Main Library"));
    }

    #[test]
    fn test_parse_printable_terminators() {
        let body = "64              00120240101    120000000000000000000000000000AOinst^AAP1^AY3AZ";
        let message = format!("{}{}~", body, checksum::calculate(body.as_bytes()));
        let config = ProtocolConfig::default().with_terminators(b'^', b'~');

        assert!(config.verify_checksum(message.as_bytes()));
        let parsed = ParsedResponse::parse(message.as_bytes(), &config);
        assert_eq!(parsed.field("AO"), Some("inst"));
        assert_eq!(parsed.field("AA"), Some("P1"));
        assert_eq!(parsed.field("AY"), Some("3"));
        assert_eq!(parsed.checksum(), Some(checksum::calculate(body.as_bytes()).as_str()));
    }

    #[test]
    fn test_parse_unknown_code() {
        let config = ProtocolConfig::default().with_checksum(false);
        let parsed = ParsedResponse::parse(b"XXAOinst|\r", &config);

        assert_eq!(parsed.message_type(), None);
        assert!(parsed.fixed_fields().is_empty());
        assert_eq!(parsed.field("AO"), Some("inst"));
    }

    #[test]
    fn test_missing_field_is_empty() {
        let config = ProtocolConfig::default();
        let parsed = ParsedResponse::parse(&signed("941"), &config);
        assert!(parsed.fields("AF").is_empty());
        assert_eq!(parsed.field("AF"), None);
    }

    #[test]
    fn test_layouts_fit_before_variable_region() {
        for t in MessageType::ALL {
            let Some(layout) = layout(t) else {
                assert!(t.is_request(), "{} has no layout", t);
                continue;
            };
            for field in layout.fixed {
                assert!(
                    field.offset + field.width <= layout.variable_offset,
                    "{} field {} overlaps variable region",
                    t,
                    field.name
                );
            }
        }
    }
}
