//! Patron status flags
//!
//! Patron status, enable and information responses carry a 14-byte field
//! where each position is either `Y` (condition applies) or a space.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PatronStatus: u16 {
        const CHARGE_PRIVILEGES_DENIED = 1;
        const RENEWAL_PRIVILEGES_DENIED = 1 << 1;
        const RECALL_PRIVILEGES_DENIED = 1 << 2;
        const HOLD_PRIVILEGES_DENIED = 1 << 3;
        const CARD_REPORTED_LOST = 1 << 4;
        const TOO_MANY_ITEMS_CHARGED = 1 << 5;
        const TOO_MANY_ITEMS_OVERDUE = 1 << 6;
        const TOO_MANY_RENEWALS = 1 << 7;
        const TOO_MANY_CLAIMS_OF_ITEMS_RETURNED = 1 << 8;
        const TOO_MANY_ITEMS_LOST = 1 << 9;
        const EXCESSIVE_OUTSTANDING_FINES = 1 << 10;
        const EXCESSIVE_OUTSTANDING_FEES = 1 << 11;
        const RECALL_OVERDUE = 1 << 12;
        const TOO_MANY_ITEMS_BILLED = 1 << 13;
    }
}

impl PatronStatus {
    /// Width of the status field
    pub const WIDTH: usize = 14;

    /// Decode a status field; positions past the field are treated as clear
    pub fn from_field(field: &str) -> Self {
        field
            .bytes()
            .take(Self::WIDTH)
            .enumerate()
            .filter(|(_, b)| *b == b'Y' || *b == b'y')
            .fold(Self::empty(), |acc, (i, _)| {
                acc | Self::from_bits_truncate(1 << i)
            })
    }

    /// Encode as a 14-byte `Y`/space field
    pub fn to_field(self) -> String {
        (0..Self::WIDTH)
            .map(|i| {
                if self.bits() & (1 << i) != 0 {
                    'Y'
                } else {
                    ' '
                }
            })
            .collect()
    }
}
