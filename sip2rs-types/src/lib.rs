//! Type definitions for sip2rs

pub mod error;
pub mod hold;
pub mod patron_status;
pub mod summary;
pub mod timestamp;

pub use error::{Error, Result};
pub use hold::{HoldMode, HoldType};
pub use patron_status::PatronStatus;
pub use summary::SummaryType;
