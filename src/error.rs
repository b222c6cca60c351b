//! Crate-level error types

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::abi::AbiError;

/// Failure while obtaining calldata or an ABI from the outside world
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transaction {hash} not found on {chain}")]
    TransactionNotFound { hash: String, chain: String },

    #[error("transaction {hash} creates a contract, its input is init code rather than calldata")]
    ContractCreation { hash: String },

    #[error("no verified ABI for {address} on {chain}: {reason}")]
    AbiUnavailable {
        chain: String,
        address: String,
        reason: String,
    },

    #[error("{action} failed: {message}")]
    Network { action: String, message: String },

    #[error(
        "unsupported chain `{0}` (see `axe constants chainid` for ids; supported names: {names})",
        names = crate::config::chains::supported_names()
    )]
    UnsupportedChain(String),

    #[error(
        "no RPC endpoint configured for {chain}: set {env} or add it under [rpc] in the config file"
    )]
    MissingRpcUrl { chain: String, env: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unexpected response from {source_name}: {message}")]
    InvalidResponse {
        source_name: String,
        message: String,
    },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn network(action: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SourceError::Network {
            action: action.into(),
            message: err.to_string(),
        }
    }
}

/// Any failure surfaced by an `axe` command
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("usage: {0}")]
    Usage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
