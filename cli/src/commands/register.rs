//! Register Command - Encrypt and register a birth date

use clap::Args;
use soulsign_astro::BirthDate;
use soulsign_registry::RegistryError;
use tracing::info;

use super::Context;

/// Encrypt a birth date and register it
#[derive(Args)]
pub struct RegisterCommand {
    /// Birth date, YYYY-MM-DD or YYYYMMDD
    #[arg(long, required_unless_present = "raw")]
    date: Option<String>,

    /// Register a raw 32-bit value instead of a calendar date
    #[arg(long, conflicts_with = "date")]
    raw: Option<u32>,

    /// Wallet name
    #[arg(short, long, default_value = "default")]
    name: String,
}

impl RegisterCommand {
    pub fn execute(self, ctx: Context) -> anyhow::Result<()> {
        let packed = match (&self.date, self.raw) {
            (Some(date), _) => BirthDate::parse(date)?.to_packed(),
            (None, Some(raw)) => raw,
            (None, None) => anyhow::bail!("Either --date or --raw is required"),
        };

        let node = ctx.open_node()?;
        let registrant = node.registrant(ctx.load_wallet(&self.name)?);
        let identity = registrant.identity();

        if node.is_registered(&identity) {
            anyhow::bail!(RegistryError::AlreadyRegistered(identity));
        }

        let tx = registrant.register_tx(node.nonce(&identity), packed)?;
        let receipt = node.submit(&tx)?;
        info!(identity = %identity, sequence = receipt.sequence, "Registration submitted");

        println!("✅ Birth date registered");
        println!();
        println!("Identity: {}", identity);
        println!("Handle:   {}", node.get_encrypted(&identity));
        println!("Tx hash:  0x{}", hex::encode(receipt.tx_hash));
        println!("Event:    #{}", receipt.sequence);
        Ok(())
    }
}
