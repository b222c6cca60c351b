//! Where calldata and its ABI come from

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy_primitives::{Address, B256};
use tracing::info;

use crate::config::chains::Chain;
use crate::domain::abi::{AbiDocument, AbiError};
use crate::error::{Error, SourceError};
use crate::infrastructure::abi::{AbiScanner, AbiSource};
use crate::infrastructure::ethereum::ChainClient;

/// One of the three ways to obtain `(calldata, ABI)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Calldata from the transaction, ABI from the explorer by its `to` address
    Transaction(B256),
    /// ABI from the explorer by contract address
    Address { address: Address, calldata: Vec<u8> },
    /// ABI from a local file or artifact directory
    AbiFile { path: PathBuf, calldata: Vec<u8> },
}

/// Raw `--tx`, `--abi`, `--address` and `--calldata` values
#[derive(Debug, Clone, Default)]
pub struct SourceSelectors {
    pub tx: Option<String>,
    pub abi: Option<PathBuf>,
    pub address: Option<String>,
    pub calldata: Option<String>,
}

impl SourceSelectors {
    /// Validate the selectors, then look up `chain`; flag misuse is reported first
    pub fn resolve(self, chain: &str) -> Result<(DataSource, Chain), Error> {
        let source = self.into_source()?;
        let chain = Chain::from_name(chain)?;
        Ok((source, chain))
    }

    /// Validate the combination and parse each value
    pub fn into_source(self) -> Result<DataSource, Error> {
        let given = [self.tx.is_some(), self.abi.is_some(), self.address.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count();
        if given != 1 {
            return Err(Error::Usage(
                "provide exactly one of --tx, --abi or --address".to_string(),
            ));
        }

        if let Some(hash) = self.tx {
            if self.calldata.is_some() {
                return Err(Error::Usage(
                    "--calldata cannot be combined with --tx, the transaction supplies it"
                        .to_string(),
                ));
            }
            return Ok(DataSource::Transaction(parse_tx_hash(&hash)?));
        }

        let flag = if self.abi.is_some() { "--abi" } else { "--address" };
        let Some(calldata) = self.calldata else {
            return Err(Error::Usage(format!("--calldata is required when using {flag}")));
        };
        let calldata = parse_hex_bytes(&calldata)?;

        match (self.abi, self.address) {
            (Some(path), _) => Ok(DataSource::AbiFile { path, calldata }),
            (None, Some(address)) => Ok(DataSource::Address {
                address: parse_address(&address)?,
                calldata,
            }),
            (None, None) => Err(Error::Usage(
                "provide exactly one of --tx, --abi or --address".to_string(),
            )),
        }
    }
}

/// Decode `0x`-prefixed (or bare) hex calldata
pub fn parse_hex_bytes(input: &str) -> Result<Vec<u8>, AbiError> {
    let trimmed = input.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(payload).map_err(|err| AbiError::MalformedCalldata(format!("invalid hex: {err}")))
}

fn parse_tx_hash(input: &str) -> Result<B256, SourceError> {
    B256::from_str(input.trim()).map_err(|err| {
        SourceError::InvalidInput(format!("invalid transaction hash `{input}`: {err}"))
    })
}

fn parse_address(input: &str) -> Result<Address, SourceError> {
    Address::from_str(input.trim())
        .map_err(|err| SourceError::InvalidInput(format!("invalid address `{input}`: {err}")))
}

/// Where a decode's inputs came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Transaction { hash: B256, to: Address, chain: Chain },
    Address { address: Address, chain: Chain },
    AbiFile { path: PathBuf },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Transaction { hash, to, chain } => {
                write!(f, "transaction {hash} to {} on {chain}", to.to_checksum(None))
            }
            Origin::Address { address, chain } => {
                write!(f, "contract {} on {chain}", address.to_checksum(None))
            }
            Origin::AbiFile { path } => write!(f, "ABI file {}", path.display()),
        }
    }
}

/// Calldata plus the ABI document to decode it with
#[derive(Debug, Clone)]
pub struct DecodeInput {
    pub calldata: Vec<u8>,
    pub abi: AbiDocument,
    pub origin: Origin,
}

impl DecodeInput {
    /// Fetch the transaction's calldata, then the verified ABI of the contract it calls
    pub async fn from_transaction(
        client: &dyn ChainClient,
        explorer: &dyn AbiSource,
        chain: &Chain,
        hash: B256,
    ) -> Result<Self, Error> {
        let tx = client
            .transaction(hash)
            .await?
            .ok_or_else(|| SourceError::TransactionNotFound {
                hash: hash.to_string(),
                chain: chain.to_string(),
            })?;
        let to = tx.to.ok_or_else(|| SourceError::ContractCreation {
            hash: hash.to_string(),
        })?;
        info!(%hash, to = %to, input_len = tx.input.len(), "fetched transaction");

        let abi = fetch_document(explorer, chain, to).await?;
        Ok(Self {
            calldata: tx.input.to_vec(),
            abi,
            origin: Origin::Transaction {
                hash,
                to,
                chain: *chain,
            },
        })
    }

    /// Fetch the verified ABI for `address`
    pub async fn from_address(
        explorer: &dyn AbiSource,
        chain: &Chain,
        address: Address,
        calldata: Vec<u8>,
    ) -> Result<Self, Error> {
        let abi = fetch_document(explorer, chain, address).await?;
        Ok(Self {
            calldata,
            abi,
            origin: Origin::Address {
                address,
                chain: *chain,
            },
        })
    }

    /// Read the ABI from disk; no network access
    pub fn from_abi_path(path: &Path, calldata: Vec<u8>) -> Result<Self, Error> {
        let abi = AbiScanner::load(path)?;
        Ok(Self {
            calldata,
            abi,
            origin: Origin::AbiFile {
                path: path.to_path_buf(),
            },
        })
    }
}

async fn fetch_document(
    explorer: &dyn AbiSource,
    chain: &Chain,
    address: Address,
) -> Result<AbiDocument, Error> {
    let raw = explorer.fetch_abi(chain, address).await?;
    let document = AbiDocument::from_value(raw)?;
    info!(
        source = explorer.name(),
        %address,
        functions = document.len(),
        "loaded verified ABI"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> SourceSelectors {
        SourceSelectors::default()
    }

    #[test]
    fn test_requires_exactly_one_source() {
        assert!(matches!(selectors().into_source(), Err(Error::Usage(_))));

        let both = SourceSelectors {
            tx: Some(format!("0x{}", "11".repeat(32))),
            address: Some(Address::ZERO.to_string()),
            ..selectors()
        };
        assert!(matches!(both.into_source(), Err(Error::Usage(_))));
    }

    #[test]
    fn test_calldata_rules() {
        let missing = SourceSelectors {
            abi: Some(PathBuf::from("abi.json")),
            ..selectors()
        };
        let Err(Error::Usage(message)) = missing.into_source() else {
            panic!("expected usage error");
        };
        assert!(message.contains("--abi"));

        let with_tx = SourceSelectors {
            tx: Some(format!("0x{}", "11".repeat(32))),
            calldata: Some("0xa9059cbb".to_string()),
            ..selectors()
        };
        assert!(matches!(with_tx.into_source(), Err(Error::Usage(_))));
    }

    #[test]
    fn test_parses_sources() {
        let tx = SourceSelectors {
            tx: Some(format!("0x{}", "ab".repeat(32))),
            ..selectors()
        };
        assert_eq!(
            tx.into_source().unwrap(),
            DataSource::Transaction(B256::repeat_byte(0xab))
        );

        let address = SourceSelectors {
            address: Some("0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string()),
            calldata: Some("0xD0E30DB0".to_string()),
            ..selectors()
        };
        let DataSource::Address { calldata, .. } = address.into_source().unwrap() else {
            panic!("expected address source");
        };
        assert_eq!(calldata, vec![0xd0, 0xe3, 0x0d, 0xb0]);
    }

    #[test]
    fn test_usage_reported_before_chain() {
        assert!(matches!(selectors().resolve("bogus"), Err(Error::Usage(_))));

        let valid = SourceSelectors {
            tx: Some(format!("0x{}", "ab".repeat(32))),
            ..selectors()
        };
        assert!(matches!(
            valid.resolve("bogus"),
            Err(Error::Source(SourceError::UnsupportedChain(_)))
        ));

        let valid = SourceSelectors {
            tx: Some(format!("0x{}", "ab".repeat(32))),
            ..selectors()
        };
        let (_, chain) = valid.resolve("Base").unwrap();
        assert_eq!(chain.chain_id, 8453);
    }

    #[test]
    fn test_invalid_values() {
        let bad_hash = SourceSelectors {
            tx: Some("0x1234".to_string()),
            ..selectors()
        };
        assert!(matches!(
            bad_hash.into_source(),
            Err(Error::Source(SourceError::InvalidInput(_)))
        ));

        let bad_calldata = SourceSelectors {
            abi: Some(PathBuf::from("abi.json")),
            calldata: Some("0xnothex".to_string()),
            ..selectors()
        };
        assert!(matches!(
            bad_calldata.into_source(),
            Err(Error::Abi(AbiError::MalformedCalldata(_)))
        ));
    }
}
