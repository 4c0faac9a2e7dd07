//! Birth dates packed as `YYYYMMDD`

use crate::AstroError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest value with eight decimal digits
const MAX_PACKED: u32 = 99_999_999;

/// Validated calendar date
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BirthDate {
    year: u32,
    month: u32,
    day: u32,
}

impl BirthDate {
    /// Build a date, checking month and day against the calendar
    pub fn new(year: u32, month: u32, day: u32) -> Result<Self, AstroError> {
        if year == 0 || year > 9999 || !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(AstroError::InvalidDate { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Decode a packed `YYYYMMDD` value
    pub fn from_packed(packed: u32) -> Result<Self, AstroError> {
        if packed > MAX_PACKED {
            return Err(AstroError::OutOfRange(packed));
        }
        Self::new(packed / 10_000, (packed / 100) % 100, packed % 100)
    }

    /// Encode as `YYYYMMDD`
    pub fn to_packed(&self) -> u32 {
        self.year * 10_000 + self.month * 100 + self.day
    }

    /// Parse `YYYY-MM-DD` or `YYYYMMDD`
    pub fn parse(s: &str) -> Result<Self, AstroError> {
        let s = s.trim();
        let digits: String = match s.len() {
            10 if s.as_bytes()[4] == b'-' && s.as_bytes()[7] == b'-' => {
                s.split('-').collect()
            }
            8 => s.to_string(),
            _ => return Err(AstroError::InvalidFormat(s.to_string())),
        };

        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AstroError::InvalidFormat(s.to_string()));
        }
        let packed = digits
            .parse::<u32>()
            .map_err(|_| AstroError::InvalidFormat(s.to_string()))?;
        Self::from_packed(packed)
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The eight digits of the packed form, most significant first
    pub fn digits(&self) -> [u8; 8] {
        let mut packed = self.to_packed();
        let mut out = [0u8; 8];
        for slot in out.iter_mut().rev() {
            *slot = (packed % 10) as u8;
            packed /= 10;
        }
        out
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for BirthDate {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_roundtrip() {
        let date = BirthDate::from_packed(19990521).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1999, 5, 21));
        assert_eq!(date.to_packed(), 19990521);
        assert_eq!(date.to_string(), "1999-05-21");
    }

    #[test]
    fn test_parse_both_forms() {
        assert_eq!(BirthDate::parse("1999-05-21").unwrap(), BirthDate::parse("19990521").unwrap());
        assert!(BirthDate::parse("1999/05/21").is_err());
        assert!(BirthDate::parse("1999-5-21").is_err());
        assert!(BirthDate::parse("19a90521").is_err());
    }

    #[test]
    fn test_leap_years() {
        assert!(BirthDate::from_packed(20000229).is_ok());
        assert!(BirthDate::from_packed(19000229).is_err());
        assert!(BirthDate::from_packed(20240229).is_ok());
        assert!(BirthDate::from_packed(20230229).is_err());
    }

    #[test]
    fn test_registrable_but_not_dates() {
        assert!(BirthDate::from_packed(0).is_err());
        assert!(BirthDate::from_packed(99_999_999).is_err());
        assert_eq!(BirthDate::from_packed(100_000_000), Err(AstroError::OutOfRange(100_000_000)));
    }

    #[test]
    fn test_digits() {
        let date = BirthDate::from_packed(19990521).unwrap();
        assert_eq!(date.digits(), [1, 9, 9, 9, 0, 5, 2, 1]);
    }
}
