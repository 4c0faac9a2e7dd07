//! Fortunes and the combined reading

use crate::life_path::{life_path_meaning, life_path_number, life_path_title};
use crate::zodiac::ZodiacSign;
use crate::BirthDate;
use serde::Serialize;

const LUCKY_TIMES: [&str; 3] = ["Morning", "Afternoon", "Evening"];

/// Per-sign fortune
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Fortune {
    pub mood: &'static str,
    /// Most compatible sign; `None` reads as "Unknown"
    pub compatibility: Option<ZodiacSign>,
    pub description: &'static str,
}

impl Fortune {
    /// Fortune when no sign is known
    pub const NEUTRAL: Fortune = Fortune {
        mood: "Neutral",
        compatibility: None,
        description: "Stay open-minded.",
    };

    /// Compatibility as display text
    pub fn compatibility_name(&self) -> &'static str {
        self.compatibility.map(|sign| sign.name()).unwrap_or("Unknown")
    }
}

pub fn fortune_for(sign: Option<ZodiacSign>) -> Fortune {
    use ZodiacSign::*;
    let Some(sign) = sign else {
        return Fortune::NEUTRAL;
    };
    let (mood, compatibility, description) = match sign {
        Aries => ("Energetic", Leo, "Today brings you a rush of energy. Take bold steps toward your goals!"),
        Taurus => ("Calm", Virgo, "You feel grounded today. Focus on practical matters and comfort."),
        Gemini => ("Curious", Libra, "Communication flows easily. A great day to learn or teach something new."),
        Cancer => ("Emotional", Pisces, "Your heart leads the way. Connect deeply with those you love."),
        Leo => ("Confident", Sagittarius, "You shine today. Step into the spotlight and express yourself."),
        Virgo => ("Analytical", Taurus, "Pay attention to the details. Small improvements bring big results."),
        Libra => ("Balanced", Gemini, "Seek harmony in relationships and make time for beauty around you."),
        Scorpio => ("Intense", Cancer, "Passion runs deep today. Trust your instincts and follow transformation."),
        Sagittarius => ("Adventurous", Aries, "Take a leap of faith. The world rewards your curiosity."),
        Capricorn => ("Focused", Virgo, "You're disciplined today. Stay consistent and success will follow."),
        Aquarius => ("Innovative", Gemini, "Think outside the box. Your ideas can inspire others today."),
        Pisces => ("Dreamy", Cancer, "Let your imagination lead. Art, music, and emotion flow easily."),
    };
    Fortune {
        mood,
        compatibility: Some(compatibility),
        description,
    }
}

/// `((life_path * 7) mod 10) + 1`
pub fn lucky_number(life_path: u32) -> u32 {
    (life_path * 7) % 10 + 1
}

pub fn lucky_time(life_path: u32) -> &'static str {
    LUCKY_TIMES[(life_path % 3) as usize]
}

/// Everything derived from one birth date
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub date: BirthDate,
    pub life_path: u32,
    pub life_path_title: &'static str,
    pub life_path_meaning: &'static str,
    pub zodiac: Option<ZodiacSign>,
    pub fortune: Fortune,
    pub lucky_number: u32,
    pub lucky_time: &'static str,
}

impl Reading {
    pub fn for_date(date: BirthDate) -> Self {
        let life_path = life_path_number(&date);
        let zodiac = ZodiacSign::from_month_day(date.month(), date.day());
        Self {
            date,
            life_path,
            life_path_title: life_path_title(life_path),
            life_path_meaning: life_path_meaning(life_path),
            zodiac,
            fortune: fortune_for(zodiac),
            lucky_number: lucky_number(life_path),
            lucky_time: lucky_time(life_path),
        }
    }
}
