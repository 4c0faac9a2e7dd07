//! Error types for derived readings

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AstroError {
    #[error("Invalid date format: {0} (expected YYYY-MM-DD or YYYYMMDD)")]
    InvalidFormat(String),

    #[error("Not a calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: u32, month: u32, day: u32 },

    #[error("Packed date out of range: {0}")]
    OutOfRange(u32),
}
