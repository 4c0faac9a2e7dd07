//! SoulSign Readings
//!
//! Display logic derived from a decrypted birth date: calendar decoding,
//! life-path numbers, zodiac signs and fortunes. This crate only ever sees a
//! plain `u32`; it has no access to handles, proofs or keys.

pub mod date;
pub mod errors;
pub mod fortune;
pub mod life_path;
pub mod zodiac;

pub use date::{is_leap_year, BirthDate};
pub use errors::AstroError;
pub use fortune::{fortune_for, lucky_number, lucky_time, Fortune, Reading};
pub use life_path::{life_path_meaning, life_path_number, life_path_title, MASTER_NUMBERS, UNIQUE_PATH_MEANING};
pub use zodiac::ZodiacSign;

/// Reading for a packed `YYYYMMDD` value
pub fn reading_from_packed(packed: u32) -> Result<Reading, AstroError> {
    Ok(Reading::for_date(BirthDate::from_packed(packed)?))
}
