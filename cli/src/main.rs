//! SoulSign CLI
//!
//! Command-line interface for a local SoulSign ledger.
//!
//! # Usage
//!
//! ```bash
//! # Create the ledger, engine key and config
//! soulsign init
//!
//! # Create a wallet and register a birth date
//! soulsign wallet create
//! soulsign register --date 1999-05-21
//!
//! # Anyone can check registration; only you can decrypt
//! soulsign status --identity 0x…
//! soulsign decrypt
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

use commands::{
    Context, DecryptCommand, EventsCommand, FortuneCommand, InitCommand, RegisterCommand, ShareCommand,
    StatusCommand, WalletCommand,
};

/// SoulSign confidential birth-date registry
#[derive(Parser)]
#[command(name = "soulsign")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Register an encrypted birth date once, decrypt it only with your key", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(short, long, global = true, env = "SOULSIGN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger
    Init(InitCommand),

    /// Wallet operations
    Wallet(WalletCommand),

    /// Encrypt and register a birth date
    Register(RegisterCommand),

    /// Show an identity's registration
    Status(StatusCommand),

    /// Allow another identity to decrypt your value
    Share(ShareCommand),

    /// Decrypt a registered value
    Decrypt(DecryptCommand),

    /// Offline reading for a date
    Fortune(FortuneCommand),

    /// List ledger events
    Events(EventsCommand),

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ctx = Context::resolve(cli.config, cli.data_dir)?;

    logging::init(&logging::LogOptions::resolve(cli.log_level, cli.json_logs, &ctx.config.logging))?;

    match cli.command {
        Commands::Init(cmd) => cmd.execute(ctx),
        Commands::Wallet(cmd) => cmd.execute(ctx),
        Commands::Register(cmd) => cmd.execute(ctx),
        Commands::Status(cmd) => cmd.execute(ctx),
        Commands::Share(cmd) => cmd.execute(ctx),
        Commands::Decrypt(cmd) => cmd.execute(ctx),
        Commands::Fortune(cmd) => cmd.execute(ctx),
        Commands::Events(cmd) => cmd.execute(ctx),
        Commands::Version => {
            println!("soulsign {}", soulsign::VERSION);
            println!("Chain id (default): {}", soulsign_fhe::DEFAULT_CHAIN_ID);
            Ok(())
        }
    }
}
