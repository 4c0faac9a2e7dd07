//! Fortune Command - Offline reading for a date

use clap::Args;
use soulsign_astro::{BirthDate, Reading};

use super::Context;

/// Show the reading for a birth date without touching the ledger
#[derive(Args)]
pub struct FortuneCommand {
    /// Birth date, YYYY-MM-DD or YYYYMMDD
    #[arg(long)]
    date: BirthDate,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl FortuneCommand {
    pub fn execute(self, _ctx: Context) -> anyhow::Result<()> {
        let reading = Reading::for_date(self.date);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&reading)?);
        } else {
            print_reading(&reading);
        }
        Ok(())
    }
}

pub(super) fn print_reading(reading: &Reading) {
    println!("Birth date:    {}", reading.date);
    println!("Zodiac:        {}", reading.zodiac.map(|sign| sign.name()).unwrap_or("Unknown"));
    println!("Mood:          {}", reading.fortune.mood);
    println!("Compatibility: {}", reading.fortune.compatibility_name());
    println!("Lucky number:  {}", reading.lucky_number);
    println!("Lucky time:    {}", reading.lucky_time);
    println!();
    println!("Life path {} - {}", reading.life_path, reading.life_path_title);
    println!("  {}", reading.life_path_meaning);
    println!();
    println!("{}", reading.fortune.description);
}
