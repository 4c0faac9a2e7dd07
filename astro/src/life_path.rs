//! Life-path numbers

use crate::BirthDate;

/// Numbers kept as-is during reduction
pub const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

/// Sum the date's digits, then keep summing while above 9 and not a master
/// number
pub fn life_path_number(date: &BirthDate) -> u32 {
    let mut sum: u32 = date.digits().iter().map(|d| u32::from(*d)).sum();
    while sum > 9 && !MASTER_NUMBERS.contains(&sum) {
        sum = digit_sum(sum);
    }
    sum
}

fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Short title for a life-path number
pub fn life_path_title(number: u32) -> &'static str {
    match number {
        1 => "The Independent Leader",
        2 => "The Peacemaker",
        3 => "The Creative Communicator",
        4 => "The Builder",
        5 => "The Freedom Seeker",
        6 => "The Nurturer",
        7 => "The Seeker of Truth",
        8 => "The Power Manifestor",
        9 => "The Humanitarian",
        11 => "The Illuminator",
        22 => "The Master Builder",
        33 => "The Master Teacher",
        _ => "The Unmapped Path",
    }
}

/// Shown for any number without its own text
pub const UNIQUE_PATH_MEANING: &str = "Your Life Path is unique, a blend of energies that make you one of a kind.";

/// Descriptive text for a life-path number
pub fn life_path_meaning(number: u32) -> &'static str {
    match number {
        1 => concat!(
            "You are born to stand at the front. You thrive when forging your own path, guided by ambition and originality. ",
            "Your purpose is to inspire others through courage and determination. ",
            "Be careful not to become overly stubborn or isolated; leadership shines brightest when you lift others with you."
        ),
        2 => concat!(
            "Your strength lies in harmony, diplomacy, and deep empathy. ",
            "You have a natural gift for understanding people and bridging differences. ",
            "Your mission is to bring balance and emotional intelligence into the world. ",
            "Remember: being kind doesn't mean being weak. Your gentleness is your true power."
        ),
        3 => concat!(
            "You are a natural artist: expressive, optimistic, and full of imagination. ",
            "Your words and ideas have the power to heal and inspire. ",
            "Your challenge is to focus your energy, as your mind is always bursting with possibilities. ",
            "When you speak from your heart, others listen."
        ),
        4 => concat!(
            "Structure, stability, and discipline define your path. ",
            "You find meaning in creating systems that last, whether in business, family, or society. ",
            "You are dependable and hardworking, but don't let practicality block your dreams. ",
            "Build not just with your hands, but with vision and faith."
        ),
        5 => concat!(
            "You crave change, adventure, and experience. ",
            "Routine suffocates you; your spirit needs space to explore. ",
            "Your gift is adaptability, your curse is restlessness. ",
            "You are here to remind others that life is meant to be lived fully, not feared."
        ),
        6 => concat!(
            "You are the heart of your community: compassionate, loyal, and protective. ",
            "Family, love, and service are sacred to you. ",
            "You bring healing energy wherever you go, but don't lose yourself in others' problems. ",
            "Learn to nurture yourself as deeply as you nurture everyone else."
        ),
        7 => concat!(
            "You are a mystic at heart, analytical yet deeply spiritual. ",
            "You're drawn to knowledge, philosophy, and the mysteries of life. ",
            "Solitude recharges you, but don't let it turn into isolation. ",
            "Your purpose is to merge intellect with intuition, to discover truth beyond appearances."
        ),
        8 => concat!(
            "You are meant to master the material world; leadership, money, and influence come naturally. ",
            "You understand systems and how to make them work. ",
            "Use your ambition wisely: when driven by integrity, you uplift everyone around you. ",
            "You are proof that spirituality and success can coexist."
        ),
        9 => concat!(
            "Your heart beats for humanity. ",
            "You carry wisdom, compassion, and a sense of universal love that transcends boundaries. ",
            "Your journey is one of letting go, of learning to forgive and release what no longer serves. ",
            "Through kindness and art, you bring healing to the world."
        ),
        11 => concat!(
            "You are a channel for inspiration: intuitive, visionary, and sensitive. ",
            "Your presence awakens others. ",
            "Life may test you early, but through those trials, you gain spiritual strength. ",
            "You're meant to light the way for others, even when your own path feels uncertain."
        ),
        22 => concat!(
            "You possess the rare ability to turn dreams into tangible reality. ",
            "Your potential is vast, practical like a 4, yet visionary like an 11. ",
            "Your challenge is self-belief: once you trust your purpose, you can manifest greatness that benefits generations."
        ),
        33 => concat!(
            "You embody unconditional love. ",
            "You are here to uplift others through compassion, creativity, and service. ",
            "Your path is not easy, as your sensitivity is both gift and burden, but when you embrace it, you radiate divine kindness. ",
            "You heal by simply being who you are."
        ),
        _ => UNIQUE_PATH_MEANING,
    }
}
