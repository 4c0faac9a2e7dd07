//! CLI Commands

mod decrypt;
mod events;
mod fortune;
mod init;
mod register;
mod share;
mod status;
mod wallet;

pub use decrypt::DecryptCommand;
pub use events::EventsCommand;
pub use fortune::FortuneCommand;
pub use init::InitCommand;
pub use register::RegisterCommand;
pub use share::ShareCommand;
pub use status::StatusCommand;
pub use wallet::WalletCommand;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use soulsign::node::{LocalNode, NodeConfig};
use soulsign_wallet::{keystore, Keypair};

use crate::config::{default_config_path, default_data_dir, SoulSignConfig};

/// Resolved paths and configuration shared by all commands
pub struct Context {
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
    pub config: SoulSignConfig,
}

impl Context {
    /// Resolve from the global flags. `--data-dir` wins over the config file,
    /// which wins over the platform default.
    pub fn resolve(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let candidate_dir = data_dir.clone().unwrap_or_else(default_data_dir);
        let config_path = config_path.unwrap_or_else(|| default_config_path(&candidate_dir));
        let config = SoulSignConfig::load_or_default(&config_path)
            .with_context(|| format!("Loading {}", config_path.display()))?;

        let data_dir = data_dir
            .or_else(|| config.storage.data_dir.clone())
            .unwrap_or(candidate_dir);

        Ok(Self {
            data_dir,
            config_path,
            config,
        })
    }

    pub fn node_config(&self) -> NodeConfig {
        self.config.node_config(&self.data_dir)
    }

    /// Open the local node; requires `init` to have run
    pub fn open_node(&self) -> anyhow::Result<LocalNode> {
        let node_config = self.node_config();
        if !node_config.db_path().exists() {
            anyhow::bail!(
                "No ledger at {}. Run `soulsign init` first.",
                self.data_dir.display()
            );
        }
        Ok(LocalNode::open(&node_config)?)
    }

    pub fn keystore_path(&self, name: &str) -> PathBuf {
        keystore_dir(&self.data_dir).join(format!("{name}.json"))
    }

    /// Load the named wallet
    pub fn load_wallet(&self, name: &str) -> anyhow::Result<Keypair> {
        let path = self.keystore_path(name);
        keystore::open(&path).with_context(|| format!("Opening wallet '{name}'"))
    }
}

pub fn keystore_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("keystore")
}
