//! Share Command - Let another identity decrypt your value

use clap::Args;
use soulsign_registry::Identity;
use tracing::info;

use super::Context;

/// Allow a viewer to decrypt your registered value
#[derive(Args)]
pub struct ShareCommand {
    /// Identity to allow
    #[arg(long)]
    viewer: Identity,

    /// Wallet name
    #[arg(short, long, default_value = "default")]
    name: String,
}

impl ShareCommand {
    pub fn execute(self, ctx: Context) -> anyhow::Result<()> {
        let node = ctx.open_node()?;
        let registrant = node.registrant(ctx.load_wallet(&self.name)?);
        let identity = registrant.identity();

        let tx = registrant.allow_viewer_tx(node.nonce(&identity), self.viewer)?;
        let receipt = node.submit(&tx)?;
        info!(owner = %identity, viewer = %self.viewer, "Viewer allowed");

        println!("✅ {} may now decrypt the value registered by {}", self.viewer, identity);
        println!("Tx hash: 0x{}", hex::encode(receipt.tx_hash));
        Ok(())
    }
}
