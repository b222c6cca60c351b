//! ABI source backed by the local SQLite cache

use alloy_primitives::Address;
use serde_json::Value;
use tracing::{debug, warn};

use super::explorer::AbiSource;
use crate::config::chains::Chain;
use crate::domain::abi::AbiDocument;
use crate::error::SourceError;
use crate::store::AbiCache;

/// Wraps an explorer, serving repeat lookups from the cache
///
/// Cache failures are logged and otherwise ignored.
pub struct CachedAbiSource {
    inner: Box<dyn AbiSource>,
    cache: Option<AbiCache>,
}

impl CachedAbiSource {
    pub fn new(inner: Box<dyn AbiSource>, cache: Option<AbiCache>) -> Self {
        Self { inner, cache }
    }

    fn cached(&self, chain: &Chain, address: &str) -> Option<Value> {
        let cache = self.cache.as_ref()?;
        match cache.get_abi(chain.chain_id, address) {
            Ok(Some(entry)) => match serde_json::from_str(&entry.abi_json) {
                Ok(abi) => {
                    debug!(chain = chain.name, address, source = %entry.source, "ABI cache hit");
                    Some(abi)
                }
                Err(err) => {
                    warn!(address, error = %err, "discarding unreadable cached ABI");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "ABI cache lookup failed");
                None
            }
        }
    }

    fn store(&self, chain: &Chain, address: &str, abi: &Value) {
        let Some(cache) = &self.cache else {
            return;
        };
        let saved = cache.save_abi(
            chain.chain_id,
            address,
            &abi.to_string(),
            self.inner.name(),
        );
        if let Err(err) = saved {
            warn!(error = %err, "failed to cache ABI");
        }
    }
}

#[async_trait::async_trait]
impl AbiSource for CachedAbiSource {
    async fn fetch_abi(&self, chain: &Chain, address: Address) -> Result<Value, SourceError> {
        let key = format!("{address:#x}");
        if let Some(abi) = self.cached(chain, &key) {
            return Ok(abi);
        }

        let abi = self.inner.fetch_abi(chain, address).await?;
        match AbiDocument::from_value(abi.clone()) {
            Ok(_) => self.store(chain, &key, &abi),
            Err(err) => debug!(address = %key, error = %err, "not caching unusable ABI"),
        }
        Ok(abi)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
