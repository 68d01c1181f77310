//! Hold request modes and types

use std::fmt;

use crate::error::{Error, Result};

/// Hold mode marker sent as the first fixed field of a hold request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HoldMode {
    /// Place a hold (`+`)
    #[default]
    Add,
    /// Cancel a hold (`-`)
    Delete,
    /// Change an existing hold (`*`)
    Change,
}

impl HoldMode {
    pub fn as_char(self) -> char {
        match self {
            Self::Add => '+',
            Self::Delete => '-',
            Self::Change => '*',
        }
    }
}

impl TryFrom<char> for HoldMode {
    type Error = Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '+' => Ok(Self::Add),
            '-' => Ok(Self::Delete),
            '*' => Ok(Self::Change),
            other => Err(Error::Validation(format!(
                "hold mode must be one of '+', '-', '*', got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for HoldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Hold type (`BY` field)
///
/// Defined values:
/// - 1: other
/// - 2: any copy of a title
/// - 3: a specific copy
/// - 4: any copy at a single branch or sublocation
///
/// The protocol reserves the remaining single digits, so 1..=9 is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoldType(u8);

impl HoldType {
    pub const OTHER: HoldType = HoldType(1);
    pub const ANY_COPY: HoldType = HoldType(2);
    pub const SPECIFIC_COPY: HoldType = HoldType(3);
    pub const ANY_COPY_AT_LOCATION: HoldType = HoldType(4);

    pub fn new(value: u8) -> Result<Self> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Validation(format!(
                "hold type must be between 1 and 9, got {}",
                value
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for HoldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
