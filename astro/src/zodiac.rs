//! Western zodiac signs

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Capricorn,
    Aquarius,
    Pisces,
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
}

/// (sign, start (month, day), end (month, day)), both ends inclusive.
/// Capricorn wraps the year end. The first match in this order wins.
const RANGES: [(ZodiacSign, (u32, u32), (u32, u32)); 12] = [
    (ZodiacSign::Capricorn, (12, 22), (1, 19)),
    (ZodiacSign::Aquarius, (1, 20), (2, 18)),
    (ZodiacSign::Pisces, (2, 19), (3, 20)),
    (ZodiacSign::Aries, (3, 21), (4, 19)),
    (ZodiacSign::Taurus, (4, 20), (5, 20)),
    (ZodiacSign::Gemini, (5, 21), (6, 20)),
    (ZodiacSign::Cancer, (6, 21), (7, 22)),
    (ZodiacSign::Leo, (7, 23), (8, 22)),
    (ZodiacSign::Virgo, (8, 23), (9, 22)),
    (ZodiacSign::Libra, (9, 23), (10, 22)),
    (ZodiacSign::Scorpio, (10, 23), (11, 21)),
    (ZodiacSign::Sagittarius, (11, 22), (12, 21)),
];

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
    ];

    /// Sign for a month/day, ignoring the year. `None` for impossible pairs.
    pub fn from_month_day(month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        RANGES
            .iter()
            .find(|(_, (start_month, start_day), (end_month, end_day))| {
                (month == *start_month && day >= *start_day) || (month == *end_month && day <= *end_day)
            })
            .map(|(sign, _, _)| *sign)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_inclusive() {
        assert_eq!(ZodiacSign::from_month_day(12, 22), Some(ZodiacSign::Capricorn));
        assert_eq!(ZodiacSign::from_month_day(1, 19), Some(ZodiacSign::Capricorn));
        assert_eq!(ZodiacSign::from_month_day(1, 20), Some(ZodiacSign::Aquarius));
        assert_eq!(ZodiacSign::from_month_day(12, 21), Some(ZodiacSign::Sagittarius));
        assert_eq!(ZodiacSign::from_month_day(5, 21), Some(ZodiacSign::Gemini));
        assert_eq!(ZodiacSign::from_month_day(5, 20), Some(ZodiacSign::Taurus));
    }

    #[test]
    fn test_every_calendar_day_has_a_sign() {
        let days = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (i, last) in days.iter().enumerate() {
            for day in 1..=*last {
                assert!(ZodiacSign::from_month_day(i as u32 + 1, day).is_some());
            }
        }
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(ZodiacSign::from_month_day(13, 1), None);
        assert_eq!(ZodiacSign::from_month_day(0, 1), None);
    }
}
