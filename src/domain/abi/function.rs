//! Function entries and ABI documents

use alloy_primitives::keccak256;
use serde::Deserialize;
use serde_json::Value;

use super::{AbiError, AbiType, TupleField};

/// Length of a function selector in bytes
pub const SELECTOR_LEN: usize = 4;

/// A named function input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name (may be empty)
    pub name: String,
    pub ty: AbiType,
}

impl Param {
    /// Name used in decoded output (`arg{n}` if unnamed)
    pub fn display_name(&self, index: usize) -> String {
        if self.name.trim().is_empty() {
            format!("arg{}", index)
        } else {
            self.name.clone()
        }
    }
}

/// One callable ABI member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub name: String,
    pub inputs: Vec<Param>,
}

impl FunctionEntry {
    pub fn new(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    /// Parse a human-readable signature like `transfer(address,uint256)`
    ///
    /// Whitespace and a trailing `returns (...)` clause are ignored; parameters are unnamed.
    pub fn parse_signature(signature: &str) -> Result<Self, AbiError> {
        let trimmed = signature.trim();
        let trimmed = trimmed.strip_prefix("function ").unwrap_or(trimmed);
        let trimmed = match trimmed.find(" returns") {
            Some(pos) => &trimmed[..pos],
            None => trimmed,
        };
        let compact: String = trimmed.split_whitespace().collect();

        let open = compact
            .find('(')
            .ok_or_else(|| AbiError::malformed_type(signature, "missing parameter list"))?;
        let (name, params) = compact.split_at(open);
        let valid_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
        if name.is_empty() || !name.chars().all(valid_char) {
            return Err(AbiError::malformed_type(
                signature,
                format!("invalid function name `{name}`"),
            ));
        }

        let AbiType::Tuple(fields) = AbiType::parse(params)? else {
            return Err(AbiError::malformed_type(signature, "expected a parameter list"));
        };
        let inputs = fields
            .into_iter()
            .map(|field| Param {
                name: field.name.unwrap_or_default(),
                ty: field.ty,
            })
            .collect();

        Ok(Self::new(name, inputs))
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|param| param.ty.canonical()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// First 4 bytes of keccak256 of the canonical signature
    pub fn selector(&self) -> [u8; SELECTOR_LEN] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector()))
    }
}

#[derive(Debug, Deserialize)]
struct JsonAbiItem {
    #[serde(rename = "type", default = "default_item_kind")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<JsonParam>,
}

#[derive(Debug, Deserialize)]
struct JsonParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<JsonParam>,
}

/// Solidity's JSON ABI treats items without a `type` as functions
fn default_item_kind() -> String {
    "function".to_string()
}

impl JsonParam {
    fn abi_type(&self) -> Result<AbiType, AbiError> {
        if !self.ty.trim().starts_with("tuple") || self.ty.contains('(') {
            return AbiType::parse(&self.ty);
        }
        if self.components.is_empty() {
            return Err(AbiError::malformed_type(&self.ty, "tuple without components"));
        }

        let fields = self
            .components
            .iter()
            .map(|component| {
                Ok(TupleField {
                    name: Some(component.name.trim())
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                    ty: component.abi_type()?,
                })
            })
            .collect::<Result<Vec<_>, AbiError>>()?;
        AbiType::tuple_with_suffix(&self.ty, fields)
    }
}

impl TryFrom<JsonAbiItem> for FunctionEntry {
    type Error = AbiError;

    fn try_from(item: JsonAbiItem) -> Result<Self, Self::Error> {
        if item.name.trim().is_empty() {
            return Err(AbiError::MalformedAbi("function entry without a name".to_string()));
        }
        let inputs = item
            .inputs
            .iter()
            .map(|input| {
                Ok(Param {
                    name: input.name.clone(),
                    ty: input.abi_type()?,
                })
            })
            .collect::<Result<Vec<_>, AbiError>>()?;
        Ok(FunctionEntry::new(item.name, inputs))
    }
}

/// The function entries of one ABI document, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbiDocument {
    functions: Vec<FunctionEntry>,
}

impl AbiDocument {
    pub fn new(functions: Vec<FunctionEntry>) -> Self {
        Self { functions }
    }

    /// Parse an ABI from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, AbiError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| AbiError::MalformedAbi(format!("invalid JSON: {err}")))?;
        Self::from_value(value)
    }

    /// Build an ABI from a JSON value
    ///
    /// Accepts a bare array of ABI items, an artifact object carrying an `abi` field,
    /// or a string holding either of those (as returned by Etherscan).
    pub fn from_value(value: Value) -> Result<Self, AbiError> {
        let items = match value {
            Value::Array(_) => value,
            Value::String(text) => return Self::from_json_str(&text),
            Value::Object(mut object) => match object.remove("abi") {
                Some(abi) => return Self::from_value(abi),
                None => {
                    return Err(AbiError::MalformedAbi(
                        "expected a JSON array or an object with an `abi` field".to_string(),
                    ))
                }
            },
            other => {
                return Err(AbiError::MalformedAbi(format!(
                    "expected a JSON array of ABI items, got `{other}`"
                )))
            }
        };

        let items: Vec<JsonAbiItem> = serde_json::from_value(items)
            .map_err(|err| AbiError::MalformedAbi(err.to_string()))?;
        let functions = items
            .into_iter()
            .filter(|item| item.kind == "function")
            .map(FunctionEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { functions })
    }

    pub fn functions(&self) -> &[FunctionEntry] {
        &self.functions
    }

    /// Append another document's functions after this one's
    pub fn extend(&mut self, other: AbiDocument) {
        self.functions.extend(other.functions);
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
