pub mod chains;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceError;
use chains::{Chain, CHAINS};

/// Block explorer used to fetch verified ABIs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExplorerKind {
    #[default]
    Etherscan,
    Sourcify,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub etherscan_api_key: Option<String>,
    pub explorer: ExplorerKind,
    pub request_timeout_secs: u64,
    pub cache_abis: bool,
    /// Chain name to RPC URL
    pub rpc: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            etherscan_api_key: None,
            explorer: ExplorerKind::default(),
            request_timeout_secs: 10,
            cache_abis: true,
            rpc: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Override file values with `ETHERSCAN_API_KEY` and the per-chain `*_RPC_URL` variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = present("ETHERSCAN_API_KEY") {
            self.etherscan_api_key = Some(key);
        }
        for chain in CHAINS {
            if let Some(url) = present(chain.rpc_env) {
                self.rpc.insert(chain.name.to_string(), url);
            }
        }
    }

    /// RPC endpoint for `chain`
    pub fn rpc_url(&self, chain: &Chain) -> Result<String, SourceError> {
        self.rpc
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(chain.name))
            .map(|(_, url)| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| SourceError::MissingRpcUrl {
                chain: chain.name.to_string(),
                env: chain.rpc_env.to_string(),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Load the config file (falling back to defaults) and apply environment overrides
pub fn load(override_path: Option<&Path>) -> Config {
    let mut config = read_file(override_path);
    config.apply_env(|key| std::env::var(key).ok());
    config
}

fn read_file(override_path: Option<&Path>) -> Config {
    let Some(path) = override_path.map(Path::to_path_buf).or_else(config_path) else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no config file, using defaults");
            return Config::default();
        }
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring invalid config file");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("AXE_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("axe").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("axe").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "axe", "axe")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("axe"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("axe"));
    }
    directories::ProjectDirs::from("io", "axe", "axe").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn abi_cache_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("abis.sqlite3"))
}
