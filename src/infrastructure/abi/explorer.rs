//! Verified-ABI lookups via Etherscan and Sourcify

use std::time::Duration;

use alloy_primitives::Address;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::chains::Chain;
use crate::error::SourceError;

const ETHERSCAN_API: &str = "https://api.etherscan.io/v2/api";
const SOURCIFY_API: &str = "https://sourcify.dev/server/v2/contract";

/// Anything that can produce the verified ABI of a deployed contract
#[async_trait::async_trait]
pub trait AbiSource: Send + Sync {
    /// Fetch the raw ABI JSON (an array of ABI items) for `address` on `chain`
    async fn fetch_abi(&self, chain: &Chain, address: Address) -> Result<Value, SourceError>;

    /// Short name used in logs and the cache (e.g. "etherscan")
    fn name(&self) -> &'static str;
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| SourceError::network("create HTTP client", err))
}

fn unavailable(chain: &Chain, address: Address, reason: impl Into<String>) -> SourceError {
    SourceError::AbiUnavailable {
        chain: chain.name.to_string(),
        address: address.to_checksum(None),
        reason: reason.into(),
    }
}

/// Etherscan `getabi` response; `result` is either a JSON string or an error message
#[derive(Debug, Deserialize)]
struct EtherscanAbiResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// Etherscan v2 multichain API
pub struct EtherscanClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl EtherscanClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, SourceError> {
        if api_key.is_none() {
            warn!(
                "ETHERSCAN_API_KEY is not set, Etherscan requests may be rejected or rate limited"
            );
        }
        Ok(Self {
            http: http_client(timeout)?,
            api_key,
            base_url: ETHERSCAN_API.to_string(),
        })
    }

    fn url(&self, chain: &Chain, address: Address) -> String {
        let mut url = format!(
            "{}?chainid={}&module=contract&action=getabi&address={:#x}",
            self.base_url, chain.chain_id, address
        );
        if let Some(key) = &self.api_key {
            url.push_str("&apikey=");
            url.push_str(key);
        }
        url
    }
}

#[async_trait::async_trait]
impl AbiSource for EtherscanClient {
    async fn fetch_abi(&self, chain: &Chain, address: Address) -> Result<Value, SourceError> {
        debug!(chain = chain.name, %address, "fetching ABI from Etherscan");
        let response = self
            .http
            .get(self.url(chain, address))
            .send()
            .await
            .map_err(|err| SourceError::network("Etherscan request", err))?;

        if !response.status().is_success() {
            return Err(SourceError::network(
                "Etherscan request",
                format!("HTTP {}", response.status()),
            ));
        }

        let body: EtherscanAbiResponse = response.json().await.map_err(|err| {
            SourceError::InvalidResponse {
                source_name: "Etherscan".to_string(),
                message: err.to_string(),
            }
        })?;
        parse_getabi_response(chain, address, body)
    }

    fn name(&self) -> &'static str {
        "etherscan"
    }
}

fn parse_getabi_response(
    chain: &Chain,
    address: Address,
    body: EtherscanAbiResponse,
) -> Result<Value, SourceError> {
    if body.status != "1" {
        let reason = match &body.result {
            Value::String(text) if !text.is_empty() => text.clone(),
            _ => body.message,
        };
        return Err(unavailable(chain, address, reason));
    }

    match body.result {
        Value::String(text) if text.trim().is_empty() => {
            Err(unavailable(chain, address, "explorer returned an empty ABI"))
        }
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|err| SourceError::InvalidResponse {
                source_name: "Etherscan".to_string(),
                message: format!("ABI is not valid JSON: {err}"),
            })
        }
        Value::Null => Err(unavailable(chain, address, "explorer returned an empty ABI")),
        structured => Ok(structured),
    }
}

/// Sourcify v2 contract lookup response
#[derive(Debug, Deserialize)]
struct SourcifyResponse {
    #[serde(default)]
    abi: Option<Value>,
    #[serde(default)]
    name: Option<String>,
}

/// Sourcify v2 API (no key needed)
pub struct SourcifyClient {
    http: reqwest::Client,
    base_url: String,
}

impl SourcifyClient {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: SOURCIFY_API.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl AbiSource for SourcifyClient {
    async fn fetch_abi(&self, chain: &Chain, address: Address) -> Result<Value, SourceError> {
        let url = format!(
            "{}/{}/{:#x}?fields=abi,name",
            self.base_url, chain.chain_id, address
        );
        debug!(chain = chain.name, %address, "fetching ABI from Sourcify");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| SourceError::network("Sourcify request", err))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(unavailable(chain, address, "contract is not verified on Sourcify"));
        }
        if !response.status().is_success() {
            return Err(SourceError::network(
                "Sourcify request",
                format!("HTTP {}", response.status()),
            ));
        }

        let data: SourcifyResponse =
            response
                .json()
                .await
                .map_err(|err| SourceError::InvalidResponse {
                    source_name: "Sourcify".to_string(),
                    message: err.to_string(),
                })?;
        if let Some(name) = &data.name {
            debug!(contract = %name, "Sourcify match");
        }
        data.abi
            .ok_or_else(|| unavailable(chain, address, "Sourcify returned no ABI"))
    }

    fn name(&self) -> &'static str {
        "sourcify"
    }
}
