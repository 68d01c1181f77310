//! Protocol constants

/// Default ACS port
pub const DEFAULT_PORT: u16 = 6001;

/// Default language code (English)
pub const DEFAULT_LANGUAGE: &str = "001";

/// Default currency for fee payments
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default variable field terminator
pub const FIELD_TERMINATOR: u8 = b'|';

/// Default message terminator (carriage return)
pub const MESSAGE_TERMINATOR: u8 = b'\r';

/// Default connection timeout (seconds)
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum consecutive checksum-failure resends
pub const MAX_RETRIES: u32 = 3;

/// Longest value a variable field may carry
pub const MAX_VARIABLE_LEN: usize = 255;

/// Hex digits in a checksum value
pub const CHECKSUM_DIGITS: usize = 4;

/// Checksum field code plus its digits
pub const CHECKSUM_FIELD_LEN: usize = 2 + CHECKSUM_DIGITS;

/// Variable field codes
pub mod fields {
    pub const PATRON_IDENTIFIER: &str = "AA";
    pub const ITEM_IDENTIFIER: &str = "AB";
    pub const TERMINAL_PASSWORD: &str = "AC";
    pub const PATRON_PASSWORD: &str = "AD";
    pub const PERSONAL_NAME: &str = "AE";
    pub const SCREEN_MESSAGE: &str = "AF";
    pub const PRINT_LINE: &str = "AG";
    pub const DUE_DATE: &str = "AH";
    pub const TITLE_IDENTIFIER: &str = "AJ";
    pub const BLOCKED_CARD_MESSAGE: &str = "AL";
    pub const LIBRARY_NAME: &str = "AM";
    pub const TERMINAL_LOCATION: &str = "AN";
    pub const INSTITUTION_ID: &str = "AO";
    pub const CURRENT_LOCATION: &str = "AP";
    pub const PERMANENT_LOCATION: &str = "AQ";
    pub const SEQUENCE_NUMBER: &str = "AY";
    pub const CHECKSUM: &str = "AZ";
    pub const HOLD_ITEMS_LIMIT: &str = "BZ";
    pub const FEE_ACKNOWLEDGED: &str = "BO";
    pub const CANCEL: &str = "BI";
    pub const START_ITEM: &str = "BP";
    pub const END_ITEM: &str = "BQ";
    pub const PICKUP_LOCATION: &str = "BS";
    pub const TRANSACTION_ID: &str = "BK";
    pub const FEE_AMOUNT: &str = "BV";
    pub const EXPIRATION_DATE: &str = "BW";
    pub const HOLD_TYPE: &str = "BY";
    pub const LOGIN_USER_ID: &str = "CN";
    pub const LOGIN_PASSWORD: &str = "CO";
    pub const LOCATION_CODE: &str = "CP";
    pub const FEE_IDENTIFIER: &str = "CG";
    pub const ITEM_PROPERTIES: &str = "CH";
}
