//! Errors raised by the ABI core

use thiserror::Error;

/// Failure while parsing ABI definitions or decoding calldata
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A type string (or JSON type entry) did not match the ABI type grammar
    #[error("malformed type `{ty}`: {reason}")]
    MalformedType { ty: String, reason: String },

    /// The ABI document itself could not be read as a list of ABI items
    #[error("malformed ABI document: {0}")]
    MalformedAbi(String),

    /// Calldata is not hex, or too short to hold a selector
    #[error("malformed calldata: {0}")]
    MalformedCalldata(String),

    /// None of the candidate functions has the calldata's selector
    #[error("no function among {candidates} ABI entries matches selector {selector}")]
    SelectorNotFound { selector: String, candidates: usize },

    /// A head slot or tail region runs past the end of the argument region
    #[error(
        "calldata truncated while decoding parameter #{index} `{name}`: \
         need {needed} bytes at offset {offset}, only {available} available"
    )]
    TruncatedCalldata {
        index: usize,
        name: String,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A dynamic value's offset points outside the argument region
    #[error(
        "invalid offset {offset} in the head slot at byte {slot} of parameter #{index} `{name}`: \
         argument region is {region} bytes"
    )]
    InvalidOffset {
        index: usize,
        name: String,
        slot: usize,
        offset: String,
        region: usize,
    },

    /// Offsets that alias one another made the decode read far more words than the region holds
    #[error(
        "parameter #{index} `{name}` expands past {limit} word reads at offset {offset}; \
         offsets in the calldata overlap"
    )]
    ExcessiveExpansion {
        index: usize,
        name: String,
        offset: usize,
        limit: usize,
    },

    /// A `string` payload is not valid UTF-8
    #[error("parameter #{index} `{name}` holds invalid UTF-8 at offset {offset}")]
    Utf8Decode {
        index: usize,
        name: String,
        offset: usize,
    },
}

impl AbiError {
    pub(crate) fn malformed_type(ty: &str, reason: impl Into<String>) -> Self {
        AbiError::MalformedType {
            ty: ty.to_string(),
            reason: reason.into(),
        }
    }
}
