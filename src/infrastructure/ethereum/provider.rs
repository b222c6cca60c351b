//! Chain RPC access
//!
//! Uses raw JSON requests for transaction fetching to support all EVM chains
//! including L2s like Optimism/Base that have non-standard transaction types.

use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use tracing::debug;

use crate::error::SourceError;

const GET_TRANSACTION: &str = "eth_getTransactionByHash";

/// Raw transaction data parsed from JSON - chain agnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    /// `None` for contract creations
    pub to: Option<Address>,
    pub input: Bytes,
}

/// Read access to a chain's transactions
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// `eth_getTransactionByHash`; `Ok(None)` when the node does not know the hash
    async fn transaction(&self, hash: B256) -> Result<Option<RawTransaction>, SourceError>;
}

/// JSON-RPC over HTTP; read-only, so no transaction fillers
pub struct HttpChainClient {
    provider: RootProvider,
    endpoint: String,
    timeout: Duration,
}

impl HttpChainClient {
    pub fn connect(url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let rpc_url = url
            .parse()
            .map_err(|err| SourceError::InvalidInput(format!("invalid RPC URL `{url}`: {err}")))?;
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(rpc_url);
        Ok(Self {
            provider,
            endpoint: url.to_string(),
            timeout,
        })
    }

    fn network_error(&self, err: impl std::fmt::Display) -> SourceError {
        SourceError::network(format!("{GET_TRANSACTION} on {}", self.endpoint), err)
    }
}

#[async_trait::async_trait]
impl ChainClient for HttpChainClient {
    async fn transaction(&self, hash: B256) -> Result<Option<RawTransaction>, SourceError> {
        debug!(endpoint = %self.endpoint, %hash, "{GET_TRANSACTION}");
        let request = self.provider.raw_request(GET_TRANSACTION.into(), (hash,));
        let json: serde_json::Value = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                self.network_error(format!("timed out after {}s", self.timeout.as_secs()))
            })?
            .map_err(|err| self.network_error(err))?;

        parse_transaction_response(&json, hash)
    }
}

/// `null` means unknown; otherwise the node must echo the requested hash
fn parse_transaction_response(
    json: &serde_json::Value,
    requested: B256,
) -> Result<Option<RawTransaction>, SourceError> {
    if json.is_null() {
        return Ok(None);
    }

    let invalid = |message: String| SourceError::InvalidResponse {
        source_name: GET_TRANSACTION.to_string(),
        message,
    };
    let field = |name: &str| json.get(name).and_then(|v| v.as_str());

    if let Some(hash) = field("hash") {
        let hash = hash
            .parse::<B256>()
            .map_err(|err| invalid(format!("bad `hash`: {err}")))?;
        if hash != requested {
            return Err(invalid(format!("asked for {requested}, node returned {hash}")));
        }
    }

    let to = match field("to") {
        Some(to) => Some(
            to.parse::<Address>()
                .map_err(|err| invalid(format!("bad `to`: {err}")))?,
        ),
        None => None,
    };

    // Some nodes still serve the legacy `data` field name
    let input_str = field("input").or_else(|| field("data")).unwrap_or("0x");
    let input = hex::decode(input_str.strip_prefix("0x").unwrap_or(input_str))
        .map_err(|err| invalid(format!("bad `input`: {err}")))?;

    Ok(Some(RawTransaction {
        to,
        input: Bytes::from(input),
    }))
}
