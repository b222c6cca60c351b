//! ABI registry - resolves calldata selectors to function entries

use std::collections::HashMap;

use tracing::{debug, warn};

use super::decoder::{decode_arguments, DecodedCall};
use super::function::{AbiDocument, FunctionEntry, SELECTOR_LEN};
use super::AbiError;

/// Function entries of one or more ABI documents, indexed by selector
#[derive(Debug, Default, Clone)]
pub struct AbiRegistry {
    /// Entries in insertion order
    functions: Vec<FunctionEntry>,
    /// Selector to index into `functions`
    by_selector: HashMap<[u8; SELECTOR_LEN], usize>,
    /// Number of entries offered, duplicates and shadowed collisions included
    candidates: usize,
}

impl AbiRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a document, keeping document order
    pub fn from_document(document: &AbiDocument) -> Self {
        let mut registry = Self::new();
        for function in document.functions() {
            registry.insert(function.clone());
        }
        registry
    }

    /// Insert a function entry
    ///
    /// Note: First function for a given selector wins (no overwrite)
    pub fn insert(&mut self, function: FunctionEntry) {
        self.candidates += 1;
        let selector = function.selector();
        match self.by_selector.get(&selector) {
            Some(&existing) => {
                let existing = &self.functions[existing];
                if existing.signature() == function.signature() {
                    debug!(signature = %function.signature(), "skipping duplicate ABI entry");
                } else {
                    warn!(
                        selector = %function.selector_hex(),
                        kept = %existing.signature(),
                        ignored = %function.signature(),
                        "selector collision in ABI, keeping the first entry"
                    );
                }
            }
            None => {
                self.by_selector.insert(selector, self.functions.len());
                self.functions.push(function);
            }
        }
    }

    /// Look up a function by selector
    pub fn lookup(&self, selector: [u8; SELECTOR_LEN]) -> Option<&FunctionEntry> {
        self.by_selector
            .get(&selector)
            .map(|&index| &self.functions[index])
    }

    /// Find the entry whose selector matches the first 4 bytes of `calldata`
    pub fn resolve(&self, calldata: &[u8]) -> Result<&FunctionEntry, AbiError> {
        let Some(selector) = calldata.get(..SELECTOR_LEN) else {
            return Err(AbiError::MalformedCalldata(format!(
                "calldata is {} bytes, need at least {SELECTOR_LEN} for the selector",
                calldata.len()
            )));
        };
        let mut key = [0u8; SELECTOR_LEN];
        key.copy_from_slice(selector);

        self.lookup(key).ok_or_else(|| AbiError::SelectorNotFound {
            selector: format!("0x{}", hex::encode(key)),
            candidates: self.candidates,
        })
    }

    /// Resolve the selector and decode the remaining bytes against the matched entry
    pub fn decode(&self, calldata: &[u8]) -> Result<DecodedCall, AbiError> {
        let function = self.resolve(calldata)?;
        decode_arguments(function, &calldata[SELECTOR_LEN..])
    }

    /// Get the number of distinct selectors
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Get all functions in insertion order
    pub fn functions(&self) -> &[FunctionEntry] {
        &self.functions
    }
}
