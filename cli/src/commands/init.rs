//! Init Command - Initialize a new ledger

use std::fs;

use clap::Args;
use soulsign::node::LocalNode;
use tracing::info;

use super::{keystore_dir, Context};
use crate::config::SoulSignConfig;

/// Initialize a new ledger
#[derive(Args)]
pub struct InitCommand {
    /// Chain id handles are bound to
    #[arg(long, default_value_t = soulsign_fhe::DEFAULT_CHAIN_ID)]
    chain_id: u64,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    pub fn execute(self, ctx: Context) -> anyhow::Result<()> {
        info!("Initializing SoulSign ledger for chain {}", self.chain_id);
        info!("Data directory: {}", ctx.data_dir.display());

        if ctx.config_path.exists() && !self.force {
            anyhow::bail!(
                "Ledger already initialized at {}. Use --force to overwrite the configuration.",
                ctx.data_dir.display()
            );
        }

        fs::create_dir_all(&ctx.data_dir)?;
        fs::create_dir_all(keystore_dir(&ctx.data_dir))?;

        let config = SoulSignConfig {
            node: crate::config::NodeSettings {
                chain_id: self.chain_id,
                ..ctx.config.node.clone()
            },
            ..ctx.config.clone()
        };
        config.save(&ctx.config_path)?;
        info!("Configuration saved to {}", ctx.config_path.display());

        let node = LocalNode::open(&config.node_config(&ctx.data_dir))?;

        println!();
        println!("✅ SoulSign ledger initialized");
        println!();
        println!("Configuration:  {}", ctx.config_path.display());
        println!("Data directory: {}", ctx.data_dir.display());
        println!("Ledger address: {}", node.address());
        println!("Chain id:       {}", node.chain_id());
        println!("Engine key:     {}", node.engine_public_key().to_hex());
        println!();
        println!("Next:");
        println!("  soulsign wallet create --data-dir {}", ctx.data_dir.display());

        Ok(())
    }
}
