//! Wallet Command - Wallet operations

use std::fs;

use clap::{Args, Subcommand};
use soulsign_wallet::keystore;
use tracing::info;

use super::{keystore_dir, Context};

/// Wallet operations
#[derive(Args)]
pub struct WalletCommand {
    #[command(subcommand)]
    action: WalletAction,
}

#[derive(Subcommand)]
enum WalletAction {
    /// Create a new wallet
    Create {
        /// Wallet name
        #[arg(short, long, default_value = "default")]
        name: String,
    },

    /// Show a wallet's identity
    Show {
        /// Wallet name
        #[arg(short, long, default_value = "default")]
        name: String,
    },

    /// List wallets
    List,
}

impl WalletCommand {
    pub fn execute(self, ctx: Context) -> anyhow::Result<()> {
        match self.action {
            WalletAction::Create { name } => create_wallet(&ctx, &name),
            WalletAction::Show { name } => show_wallet(&ctx, &name),
            WalletAction::List => list_wallets(&ctx),
        }
    }
}

fn create_wallet(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let path = ctx.keystore_path(name);
    let keypair = keystore::create(&path)?;
    info!(wallet = name, identity = %keypair.identity(), "Wallet created");

    println!("✅ Wallet '{}' created", name);
    println!();
    println!("Identity: {}", keypair.identity());
    println!("Keystore: {}", path.display());
    println!();
    println!("⚠️  The keystore holds your signing key unencrypted. Back it up and keep it private.");
    Ok(())
}

fn show_wallet(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let keypair = ctx.load_wallet(name)?;
    println!("Wallet:     {}", name);
    println!("Identity:   {}", keypair.identity());
    println!("Public key: {}", hex::encode(keypair.verifying_key().to_bytes()));
    Ok(())
}

fn list_wallets(ctx: &Context) -> anyhow::Result<()> {
    let dir = keystore_dir(&ctx.data_dir);
    if !dir.exists() {
        println!("No wallets found");
        return Ok(());
    }

    let mut names: Vec<String> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
            } else {
                None
            }
        })
        .collect();
    names.sort();

    if names.is_empty() {
        println!("No wallets found");
    }
    for name in names {
        match ctx.load_wallet(&name) {
            Ok(keypair) => println!("  {:<16} {}", name, keypair.identity()),
            Err(e) => println!("  {:<16} (unreadable: {})", name, e),
        }
    }
    Ok(())
}
