//! Decrypt Command - Recover a registered value

use clap::Args;
use serde_json::json;
use soulsign::node::unix_now;
use soulsign_registry::Identity;

use super::fortune::print_reading;
use super::Context;

/// Decrypt a registered birth date
#[derive(Args)]
pub struct DecryptCommand {
    /// Whose value to decrypt; defaults to the wallet's own
    #[arg(long)]
    subject: Option<Identity>,

    /// Wallet name of the requester
    #[arg(short, long, default_value = "default")]
    name: String,

    /// Request validity in days; defaults to the configured value
    #[arg(long)]
    days: Option<u32>,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl DecryptCommand {
    pub fn execute(self, ctx: Context) -> anyhow::Result<()> {
        let node = ctx.open_node()?;
        let registrant = node.registrant(ctx.load_wallet(&self.name)?);
        let subject = self.subject.unwrap_or_else(|| registrant.identity());
        let days = self.days.unwrap_or(ctx.config.decryption.validity_days);

        let handle = node.get_encrypted(&subject);
        let now = unix_now();
        let request = registrant.decrypt_request(handle, now, days);

        let Some(value) = node.decrypt(&subject, &request, now)? else {
            println!("{} has not registered", subject);
            return Ok(());
        };

        let reading = soulsign_astro::reading_from_packed(value).ok();

        if self.json {
            let output = json!({
                "subject": subject.to_hex(),
                "value": value,
                "reading": reading,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("🔓 Decrypted value for {}", subject);
        println!();
        match reading {
            Some(reading) => print_reading(&reading),
            None => println!("Value: {} (not a calendar date)", value),
        }
        Ok(())
    }
}
