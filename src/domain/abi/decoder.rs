//! ABI decoder for function calldata
//!
//! Every decode function takes the full argument region plus explicit positions; the only
//! state shared between sibling fields is the region's word-read budget, which caps the work
//! aliased offsets can cause. Each returns the decoded value and the furthest byte it read,
//! so callers can tell how much of the region a decode covered.

use std::cell::Cell;

use alloy_primitives::{Address, I256, U256};
use serde::Serialize;
use tracing::debug;

use super::function::SELECTOR_LEN;
use super::types::WORD;
use super::value::ParameterMap;
use super::{AbiError, AbiType, DecodedValue, FunctionEntry};

/// Result of decoding a function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    /// The matched function
    pub function: FunctionEntry,
    /// Decoded inputs in declaration order
    pub parameters: Vec<(String, DecodedValue)>,
    /// Bytes of the argument region covered by the decode
    pub consumed: usize,
}

impl DecodedCall {
    /// Full function signature (e.g., "transfer(address,uint256)")
    pub fn signature(&self) -> String {
        self.function.signature()
    }

    /// Parameters as an ordered JSON-serializable mapping
    pub fn parameter_map(&self) -> ParameterMap<'_> {
        ParameterMap(&self.parameters)
    }

    /// Look up a decoded parameter by name
    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.parameters
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }
}

#[derive(Serialize)]
struct DecodedCallJson<'a> {
    function: &'a str,
    signature: String,
    selector: String,
    parameters: ParameterMap<'a>,
}

impl Serialize for DecodedCall {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DecodedCallJson {
            function: &self.function.name,
            signature: self.function.signature(),
            selector: self.function.selector_hex(),
            parameters: self.parameter_map(),
        }
        .serialize(serializer)
    }
}

/// Decode full calldata (selector included) against a known function
pub fn decode_calldata(
    function: &FunctionEntry,
    calldata: &[u8],
) -> Result<DecodedCall, AbiError> {
    if calldata.len() < SELECTOR_LEN {
        return Err(AbiError::MalformedCalldata(format!(
            "calldata is {} bytes, need at least {SELECTOR_LEN} for the selector",
            calldata.len()
        )));
    }

    let (selector, arguments) = calldata.split_at(SELECTOR_LEN);
    if selector != function.selector() {
        return Err(AbiError::SelectorNotFound {
            selector: format!("0x{}", hex::encode(selector)),
            candidates: 1,
        });
    }

    decode_arguments(function, arguments)
}

/// Decode the argument region (calldata after the selector) against a function's inputs
pub fn decode_arguments(function: &FunctionEntry, data: &[u8]) -> Result<DecodedCall, AbiError> {
    let region = Region::new(data);
    let mut parameters = Vec::with_capacity(function.inputs.len());
    let mut head = 0usize;
    let mut consumed = 0usize;

    for (index, param) in function.inputs.iter().enumerate() {
        let name = param.display_name(index);
        let (value, end) = decode_slot(&param.ty, &region, 0, head)
            .map_err(|fault| fault.into_error(index, &name))?;
        parameters.push((name, value));
        consumed = consumed.max(end);
        head = head.saturating_add(param.ty.head_size());
    }

    if consumed < data.len() {
        debug!(
            function = %function.signature(),
            trailing = data.len() - consumed,
            "ignoring bytes past the encoded arguments"
        );
    }

    Ok(DecodedCall {
        function: function.clone(),
        parameters,
        consumed,
    })
}

/// Word reads allowed per word of the argument region; a well-formed encoding reads each
/// word at most once
const READS_PER_WORD: usize = 4;

/// The argument region plus the number of word reads left
struct Region<'a> {
    data: &'a [u8],
    limit: usize,
    reads_left: Cell<usize>,
}

impl<'a> Region<'a> {
    fn new(data: &'a [u8]) -> Self {
        let limit = data.len().div_ceil(WORD).saturating_mul(READS_PER_WORD);
        Self {
            data,
            limit,
            reads_left: Cell::new(limit),
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn truncated(&self, offset: usize, needed: usize) -> Fault {
        Fault::Truncated {
            offset,
            needed,
            available: self.len().saturating_sub(offset),
        }
    }

    fn read_word(&self, pos: usize) -> Result<&'a [u8], Fault> {
        let word = pos
            .checked_add(WORD)
            .and_then(|end| self.data.get(pos..end))
            .ok_or_else(|| self.truncated(pos, WORD))?;
        let left = self.reads_left.get();
        if left == 0 {
            return Err(Fault::Expansion {
                offset: pos,
                limit: self.limit,
            });
        }
        self.reads_left.set(left - 1);
        Ok(word)
    }

    fn read_length(&self, pos: usize) -> Result<usize, Fault> {
        let len = U256::from_be_slice(self.read_word(pos)?);
        if len > U256::from(self.len()) {
            return Err(self.truncated(pos + WORD, len.saturating_to::<usize>()));
        }
        Ok(len.to::<usize>())
    }

    /// Read a length word at `pos` and the payload after it; returns the payload and the
    /// end of its padded extent (clamped to the region)
    fn read_length_prefixed(&self, pos: usize) -> Result<(&'a [u8], usize), Fault> {
        let len = self.read_length(pos)?;
        let start = pos + WORD;
        let payload = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| self.truncated(start, len))?;
        let padded = len.div_ceil(WORD) * WORD;
        Ok((payload, (start + padded).min(self.len())))
    }
}

/// Decode failure before it is attributed to a top-level parameter
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fault {
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    InvalidOffset {
        slot: usize,
        offset: U256,
        region: usize,
    },
    Utf8 {
        offset: usize,
    },
    Expansion {
        offset: usize,
        limit: usize,
    },
}

impl Fault {
    fn into_error(self, index: usize, name: &str) -> AbiError {
        let name = name.to_string();
        match self {
            Fault::Truncated {
                offset,
                needed,
                available,
            } => AbiError::TruncatedCalldata {
                index,
                name,
                offset,
                needed,
                available,
            },
            Fault::InvalidOffset {
                slot,
                offset,
                region,
            } => AbiError::InvalidOffset {
                index,
                name,
                slot,
                offset: offset.to_string(),
                region,
            },
            Fault::Utf8 { offset } => AbiError::Utf8Decode {
                index,
                name,
                offset,
            },
            Fault::Expansion { offset, limit } => AbiError::ExcessiveExpansion {
                index,
                name,
                offset,
                limit,
            },
        }
    }
}

type Decoded = Result<(DecodedValue, usize), Fault>;

/// Decode the value whose head slot starts at `head`; offsets resolve against `base`
fn decode_slot(ty: &AbiType, region: &Region<'_>, base: usize, head: usize) -> Decoded {
    if !ty.is_dynamic() {
        return decode_at(ty, region, head);
    }

    let offset = U256::from_be_slice(region.read_word(head)?);
    let target = resolve_offset(offset, region.len(), base, head)?;
    let (value, end) = decode_at(ty, region, target)?;
    Ok((value, end.max(head + WORD)))
}

fn resolve_offset(offset: U256, region: usize, base: usize, slot: usize) -> Result<usize, Fault> {
    let invalid = || Fault::InvalidOffset {
        slot,
        offset,
        region,
    };
    if offset >= U256::from(region) {
        return Err(invalid());
    }
    base.checked_add(offset.to::<usize>())
        .filter(|target| *target < region)
        .ok_or_else(invalid)
}

/// Decode `ty` whose encoding starts at `pos`: the head slot for static types,
/// the tail position an offset pointed to for dynamic ones
fn decode_at(ty: &AbiType, region: &Region<'_>, pos: usize) -> Decoded {
    match ty {
        AbiType::Uint(_) => {
            let word = region.read_word(pos)?;
            Ok((DecodedValue::Uint(U256::from_be_slice(word)), pos + WORD))
        }
        AbiType::Int(_) => {
            let word = region.read_word(pos)?;
            let value = I256::from_raw(U256::from_be_slice(word));
            Ok((DecodedValue::Int(value), pos + WORD))
        }
        AbiType::Address => {
            let word = region.read_word(pos)?;
            let address = Address::from_slice(&word[WORD - 20..]);
            Ok((DecodedValue::Address(address), pos + WORD))
        }
        AbiType::Bool => {
            let word = region.read_word(pos)?;
            let value = word.iter().any(|b| *b != 0);
            Ok((DecodedValue::Bool(value), pos + WORD))
        }
        AbiType::FixedBytes(len) => {
            let word = region.read_word(pos)?;
            Ok((DecodedValue::FixedBytes(word[..*len].to_vec()), pos + WORD))
        }
        AbiType::Bytes => {
            let (payload, end) = region.read_length_prefixed(pos)?;
            Ok((DecodedValue::Bytes(payload.to_vec()), end))
        }
        AbiType::String => {
            let (payload, end) = region.read_length_prefixed(pos)?;
            let text = std::str::from_utf8(payload)
                .map_err(|err| Fault::Utf8 {
                    offset: pos + WORD + err.valid_up_to(),
                })?
                .to_string();
            Ok((DecodedValue::String(text), end))
        }
        AbiType::Array(inner) => {
            let len = region.read_length(pos)?;
            let start = pos + WORD;
            let needed = len.saturating_mul(inner.head_size().max(1));
            if region.len().saturating_sub(start) < needed {
                return Err(region.truncated(start, needed));
            }
            let elements = std::iter::repeat(inner.as_ref()).take(len);
            let (items, end) = decode_sequence(elements, region, start)?;
            Ok((DecodedValue::Array(items), end.max(start)))
        }
        AbiType::FixedArray(inner, len) => {
            let elements = std::iter::repeat(inner.as_ref()).take(*len);
            let (items, end) = decode_sequence(elements, region, pos)?;
            Ok((DecodedValue::Array(items), end))
        }
        AbiType::Tuple(fields) => {
            let (values, end) = decode_sequence(fields.iter().map(|field| &field.ty), region, pos)?;
            let fields = fields
                .iter()
                .map(|field| field.name.clone())
                .zip(values)
                .collect();
            Ok((DecodedValue::Tuple(fields), end))
        }
    }
}

/// Decode consecutive head slots starting at `base`; dynamic members resolve against `base`
fn decode_sequence<'a>(
    types: impl Iterator<Item = &'a AbiType>,
    region: &Region<'_>,
    base: usize,
) -> Result<(Vec<DecodedValue>, usize), Fault> {
    let mut values = Vec::new();
    let mut head = base;
    let mut end = base;
    for ty in types {
        let (value, value_end) = decode_slot(ty, region, base, head)?;
        values.push(value);
        end = end.max(value_end);
        head = head.saturating_add(ty.head_size());
    }
    Ok((values, end))
}
