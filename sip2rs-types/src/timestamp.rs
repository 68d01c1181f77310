//! 18-byte protocol timestamps
//!
//! ```text
//! ┌──────────┬──────┬────────┐
//! │ YYYYMMDD │ ZZZZ │ HHMMSS │
//! │  8 bytes │  4   │ 6 bytes│
//! └──────────┴──────┴────────┘
//! ```
//!
//! The four zone bytes are spaces for local time. Peers may send a zone
//! marker in the last of those bytes (`Z` for UTC); this module accepts
//! such values when parsing but always emits local time.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Width of a timestamp field in bytes
pub const WIDTH: usize = 18;

const FORMAT: &str = "%Y%m%d    %H%M%S";

/// Format an instant as a local-time protocol timestamp
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sip2rs_types::timestamp;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(7, 5, 1).unwrap();
/// assert_eq!(timestamp::format(at), "20240309    070501");
/// ```
pub fn format(at: NaiveDateTime) -> String {
    at.format(FORMAT).to_string()
}

/// Current local time as a protocol timestamp
pub fn now() -> String {
    format(Local::now().naive_local())
}

/// Format an optional instant, or `now()` when absent
pub fn or_now(at: Option<NaiveDateTime>) -> String {
    at.map(format).unwrap_or_else(now)
}

/// Parse a protocol timestamp, ignoring the zone bytes
pub fn parse(value: &str) -> Result<NaiveDateTime> {
    if value.len() != WIDTH || !value.is_ascii() {
        return Err(Error::Parse(format!(
            "timestamp must be {} ASCII bytes, got {:?}",
            WIDTH, value
        )));
    }

    let date = NaiveDate::parse_from_str(&value[..8], "%Y%m%d")
        .map_err(|e| Error::Parse(format!("date {:?}: {}", &value[..8], e)))?;
    let time = NaiveTime::parse_from_str(&value[12..], "%H%M%S")
        .map_err(|e| Error::Parse(format!("time {:?}: {}", &value[12..], e)))?;

    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 30)
            .unwrap()
            .and_hms_opt(23, 59, 8)
            .unwrap()
    }

    #[test]
    fn test_format_width() {
        let s = format(sample());
        assert_eq!(s, "20231130    235908");
        assert_eq!(s.len(), WIDTH);
        assert_eq!(now().len(), WIDTH);
    }

    #[test]
    fn test_parse_local_and_utc() {
        assert_eq!(parse("20231130    235908").unwrap(), sample());
        assert_eq!(parse("20231130   Z235908").unwrap(), sample());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("2023").is_err());
        assert!(parse("2023XX30    235908").is_err());
        assert!(parse("20231130    256199").is_err());
    }

    #[test]
    fn test_or_now() {
        assert_eq!(or_now(Some(sample())), "20231130    235908");
        assert_eq!(or_now(None).len(), WIDTH);
    }
}
