//! Message checksum
//!
//! The protocol documentation calls this field a "CRC", but it is an
//! additive checksum:
//! 1. Sum every byte of the message body as an unsigned integer
//! 2. Negate modulo 65536 (two's complement over the low 16 bits)
//! 3. Render as four uppercase hex digits
//!
//! The body covers everything from the message code up to and including
//! the `AZ` field code.

use tracing::trace;

use crate::constants::CHECKSUM_DIGITS;
use crate::response::trim_message;

/// Calculate the checksum of a message body
///
/// # Examples
///
/// ```
/// use sip2rs_core::checksum;
///
/// assert_eq!(checksum::calculate(b"AZ"), "FF65");
/// assert_eq!(checksum::calculate(b""), "0000");
/// ```
pub fn calculate(body: &[u8]) -> String {
    let sum = body
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));

    // Only the low 16 bits survive the negation
    let checksum = (sum as u16).wrapping_neg();
    let rendered = hex::encode_upper(checksum.to_be_bytes());

    trace!(
        body_len = body.len(),
        checksum = %rendered,
        "Calculated checksum"
    );

    rendered
}

/// Verify the trailing checksum of a complete message
///
/// Surrounding whitespace and `terminator` bytes are trimmed first; the
/// last four bytes are the claimed checksum and everything before them is
/// the body. Comparison is case-sensitive.
pub fn verify(message: &[u8], terminator: u8) -> bool {
    let message = trim_message(message, terminator);

    if message.len() < CHECKSUM_DIGITS {
        return false;
    }

    let (body, claimed) = message.split_at(message.len() - CHECKSUM_DIGITS);
    calculate(body).as_bytes() == claimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_known_values() {
        assert_eq!(calculate(b"990 402.00AY1AZ"), "FCB4");
        assert_eq!(calculate(b"9300CNuser|COpass|AY0AZ"), "F83E");
    }

    #[test]
    fn test_checksum_wraps_low_16_bits() {
        // 258 * 0xFF = 65790, low 16 bits = 254
        let body = vec![0xFF; 258];
        assert_eq!(calculate(&body), "FF02");
    }

    #[test]
    fn test_verify() {
        assert!(verify(b"990 402.00AY1AZFCB4\r", b'\r'));
        assert!(verify(b"990 402.00AY1AZFCB4", b'\r'));
        assert!(!verify(b"990 402.00AY1AZFCB5\r", b'\r'));
        // Lowercase digits do not match
        assert!(!verify(b"990 402.00AY1AZfcb4\r", b'\r'));
    }

    #[test]
    fn test_verify_too_short() {
        assert!(!verify(b"", b'\r'));
        assert!(!verify(b"AZ\r", b'\r'));
    }

    #[test]
    fn test_verify_ignores_leading_line_feed() {
        assert!(verify(b"\n990 402.00AY1AZFCB4\r", b'\r'));
    }

    #[test]
    fn test_verify_printable_terminator() {
        assert!(verify(b"990 402.00AY1AZFCB4~", b'~'));
        assert!(verify(b"990 402.00AY1AZFCB4~~", b'~'));
        // The terminator is not stripped unless it is the configured one
        assert!(!verify(b"990 402.00AY1AZFCB4~", b'\r'));
    }

    proptest! {
        #[test]
        fn prop_checksum_roundtrip(body in "[ -~]{0,300}") {
            let mut message = format!("99{}AZ", body);
            message.push_str(&calculate(message.as_bytes()));
            message.push('\r');
            prop_assert!(verify(message.as_bytes(), b'\r'));
        }

        #[test]
        fn prop_checksum_roundtrip_any_terminator(body in "[ -}]{0,100}", terminator in b'!'..=b'/') {
            let mut message = format!("99{}AZ", body).into_bytes();
            let cs = calculate(&message);
            message.extend_from_slice(cs.as_bytes());
            message.push(terminator);
            prop_assert!(verify(&message, terminator));
        }

        #[test]
        fn prop_checksum_is_four_upper_hex(body in proptest::collection::vec(any::<u8>(), 0..512)) {
            let cs = calculate(&body);
            prop_assert_eq!(cs.len(), 4);
            prop_assert!(cs.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
            prop_assert_eq!(cs.clone(), calculate(&body));
        }
    }
}
