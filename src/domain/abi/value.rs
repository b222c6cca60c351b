//! Decoded ABI values

use std::borrow::Cow;
use std::collections::HashSet;

use alloy_primitives::{Address, I256, U256};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A decoded ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    Uint(U256),
    Int(I256),
    Bool(bool),
    Address(Address),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    /// Elements of a dynamic or fixed-size array
    Array(Vec<DecodedValue>),
    /// Tuple fields with their component names, if the ABI provided them
    Tuple(Vec<(Option<String>, DecodedValue)>),
}

impl DecodedValue {
    /// Checksummed address, `0x` hex for bytes, decimal for integers
    pub fn to_display_string(&self) -> String {
        match self {
            DecodedValue::Uint(v) => v.to_string(),
            DecodedValue::Int(v) => v.to_string(),
            DecodedValue::Bool(b) => b.to_string(),
            DecodedValue::Address(addr) => addr.to_checksum(None),
            DecodedValue::FixedBytes(bytes) | DecodedValue::Bytes(bytes) => {
                format!("0x{}", hex::encode(bytes))
            }
            DecodedValue::String(s) => s.clone(),
            DecodedValue::Array(items) => {
                let items: Vec<String> = items.iter().map(Self::to_display_string).collect();
                format!("[{}]", items.join(", "))
            }
            DecodedValue::Tuple(fields) => {
                let items: Vec<String> =
                    fields.iter().map(|(_, v)| v.to_display_string()).collect();
                format!("({})", items.join(", "))
            }
        }
    }
}

impl Serialize for DecodedValue {
    /// Integers that fit 64 bits serialize as JSON numbers, larger ones as decimal strings.
    /// Tuples whose fields are all named serialize as objects, otherwise as arrays.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Uint(v) => {
                if *v <= U256::from(u64::MAX) {
                    serializer.serialize_u64(v.to::<u64>())
                } else {
                    serializer.serialize_str(&v.to_string())
                }
            }
            DecodedValue::Int(v) => {
                let text = v.to_string();
                match text.parse::<i64>() {
                    Ok(n) => serializer.serialize_i64(n),
                    Err(_) => serializer.serialize_str(&text),
                }
            }
            DecodedValue::Bool(b) => serializer.serialize_bool(*b),
            DecodedValue::Address(_)
            | DecodedValue::FixedBytes(_)
            | DecodedValue::Bytes(_) => serializer.serialize_str(&self.to_display_string()),
            DecodedValue::String(s) => serializer.serialize_str(s),
            DecodedValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DecodedValue::Tuple(fields) => {
                if !fields.is_empty() && fields.iter().all(|(name, _)| name.is_some()) {
                    let keys = unique_keys(
                        fields.iter().map(|(name, _)| name.as_deref().unwrap_or_default()),
                    );
                    let mut map = serializer.serialize_map(Some(fields.len()))?;
                    for (key, (_, value)) in keys.iter().zip(fields) {
                        map.serialize_entry(key.as_ref(), value)?;
                    }
                    map.end()
                } else {
                    let mut seq = serializer.serialize_seq(Some(fields.len()))?;
                    for (_, value) in fields {
                        seq.serialize_element(value)?;
                    }
                    seq.end()
                }
            }
        }
    }
}

/// Ordered `name -> value` view of decoded parameters, serialized as a JSON object
#[derive(Debug, Clone, Copy)]
pub struct ParameterMap<'a>(pub &'a [(String, DecodedValue)]);

impl Serialize for ParameterMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys = unique_keys(self.0.iter().map(|(name, _)| name.as_str()));
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, (_, value)) in keys.iter().zip(self.0) {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}

/// JSON object keys for `names`: repeats become `name_1`, `name_2`, ... skipping names
/// that are already taken
fn unique_keys<'a>(names: impl Iterator<Item = &'a str> + Clone) -> Vec<Cow<'a, str>> {
    let declared: HashSet<&str> = names.clone().collect();
    let mut used: HashSet<String> = HashSet::new();
    names
        .map(|name| {
            if used.insert(name.to_string()) {
                return Cow::Borrowed(name);
            }
            let mut suffix = 1usize;
            loop {
                let candidate = format!("{name}_{suffix}");
                if !declared.contains(candidate.as_str()) && used.insert(candidate.clone()) {
                    return Cow::Owned(candidate);
                }
                suffix += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_small_integers_serialize_as_numbers() {
        let value = DecodedValue::Uint(U256::from(1_000_000u64));
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(1_000_000));

        let value = DecodedValue::Int(I256::from_str("-42").unwrap());
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(-42));
    }

    #[test]
    fn test_large_integers_serialize_as_strings() {
        let value = DecodedValue::Uint(U256::MAX);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!(U256::MAX.to_string())
        );

        let value = DecodedValue::Int(I256::MIN);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!(I256::MIN.to_string())
        );
    }

    #[test]
    fn test_address_is_checksummed() {
        let addr = Address::from_str("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        let value = DecodedValue::Address(addr);
        assert_eq!(
            value.to_display_string(),
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
    }

    #[test]
    fn test_tuple_serialization() {
        let named = DecodedValue::Tuple(vec![
            (Some("id".to_string()), DecodedValue::Uint(U256::from(7))),
            (Some("ok".to_string()), DecodedValue::Bool(true)),
        ]);
        assert_eq!(
            serde_json::to_value(&named).unwrap(),
            json!({"id": 7, "ok": true})
        );

        let unnamed = DecodedValue::Tuple(vec![
            (None, DecodedValue::Bytes(vec![0xab, 0xcd])),
            (Some("s".to_string()), DecodedValue::String("x".to_string())),
        ]);
        assert_eq!(serde_json::to_value(&unnamed).unwrap(), json!(["0xabcd", "x"]));
    }

    #[test]
    fn test_parameter_map_preserves_order() {
        let params = vec![
            ("zeta".to_string(), DecodedValue::Bool(false)),
            ("alpha".to_string(), DecodedValue::Uint(U256::from(1))),
        ];
        let text = serde_json::to_string(&ParameterMap(&params)).unwrap();
        assert_eq!(text, r#"{"zeta":false,"alpha":1}"#);
    }

    #[test]
    fn test_repeated_names_get_distinct_keys() {
        let params = vec![
            ("a".to_string(), DecodedValue::Uint(U256::from(1))),
            ("a".to_string(), DecodedValue::Uint(U256::from(2))),
            ("a_1".to_string(), DecodedValue::Uint(U256::from(3))),
        ];
        let text = serde_json::to_string(&ParameterMap(&params)).unwrap();
        assert_eq!(text, r#"{"a":1,"a_2":2,"a_1":3}"#);

        let tuple = DecodedValue::Tuple(vec![
            (Some("x".to_string()), DecodedValue::Bool(true)),
            (Some("x".to_string()), DecodedValue::Bool(false)),
        ]);
        assert_eq!(
            serde_json::to_value(&tuple).unwrap(),
            json!({"x": true, "x_1": false})
        );
    }
}
