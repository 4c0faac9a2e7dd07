//! Status Command - Show an identity's registration

use clap::Args;
use serde_json::json;
use soulsign_registry::Identity;

use super::Context;

/// Show whether an identity registered, and its handle
#[derive(Args)]
pub struct StatusCommand {
    /// Identity to look up; defaults to the wallet's
    #[arg(long)]
    identity: Option<Identity>,

    /// Wallet name, used when --identity is absent
    #[arg(short, long, default_value = "default")]
    name: String,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl StatusCommand {
    pub fn execute(self, ctx: Context) -> anyhow::Result<()> {
        let identity = match self.identity {
            Some(identity) => identity,
            None => ctx.load_wallet(&self.name)?.identity(),
        };

        let node = ctx.open_node()?;
        let handle = node.get_encrypted(&identity);
        let registered = !handle.is_empty();

        if self.json {
            let output = json!({
                "ledger": node.address().to_hex(),
                "identity": identity.to_hex(),
                "registered": registered,
                "handle": handle.to_hex(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Ledger:     {}", node.address());
        println!("Identity:   {}", identity);
        println!("Registered: {}", if registered { "yes" } else { "no" });
        println!("Handle:     {}", handle);
        Ok(())
    }
}
