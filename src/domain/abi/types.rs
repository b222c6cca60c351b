//! ABI type descriptors and the Solidity type-string parser

use std::fmt;

use super::AbiError;

/// Size of one ABI word in bytes
pub const WORD: usize = 32;

const MAX_NESTING: usize = 64;

/// A parsed ABI parameter type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    /// Unsigned integer with bit width (8..=256, multiple of 8)
    Uint(usize),
    /// Signed integer with bit width
    Int(usize),
    Address,
    Bool,
    /// Fixed-size byte array (1..=32)
    FixedBytes(usize),
    /// Dynamic byte sequence
    Bytes,
    String,
    /// `T[N]`
    FixedArray(Box<AbiType>, usize),
    /// `T[]`
    Array(Box<AbiType>),
    /// `(T1,T2,...)`
    Tuple(Vec<TupleField>),
}

/// One component of a tuple type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleField {
    /// Component name from the JSON ABI, if any. Never part of the canonical signature.
    pub name: Option<String>,
    pub ty: AbiType,
}

impl TupleField {
    pub fn unnamed(ty: AbiType) -> Self {
        Self { name: None, ty }
    }
}

impl AbiType {
    /// Parse a Solidity ABI type string such as `uint256`, `address[]`,
    /// `bytes32[3]` or `tuple(uint256,address)[]`
    pub fn parse(ty: &str) -> Result<Self, AbiError> {
        parse_type(ty.trim(), 0).map_err(|reason| AbiError::malformed_type(ty, reason))
    }

    /// Build a tuple type from a JSON ABI `type` field (`tuple`, `tuple[]`, `tuple[2][]`, ...)
    /// and its already-parsed `components`
    pub fn tuple_with_suffix(ty: &str, fields: Vec<TupleField>) -> Result<Self, AbiError> {
        let suffix = ty
            .trim()
            .strip_prefix("tuple")
            .ok_or_else(|| AbiError::malformed_type(ty, "expected a `tuple` type"))?;
        let dims = parse_dimensions(suffix).map_err(|reason| AbiError::malformed_type(ty, reason))?;
        Ok(wrap_dimensions(AbiType::Tuple(fields), &dims))
    }

    /// Whether the type is encoded through an offset into the tail region
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::Array(_) => true,
            AbiType::FixedArray(inner, _) => inner.is_dynamic(),
            AbiType::Tuple(fields) => fields.iter().any(|field| field.ty.is_dynamic()),
            AbiType::Uint(_)
            | AbiType::Int(_)
            | AbiType::Address
            | AbiType::Bool
            | AbiType::FixedBytes(_) => false,
        }
    }

    /// Number of bytes the type occupies in a head region
    ///
    /// Dynamic types take a single offset word; static arrays and tuples are laid out inline.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD;
        }
        match self {
            AbiType::FixedArray(inner, len) => inner.head_size().saturating_mul(*len),
            AbiType::Tuple(fields) => fields
                .iter()
                .fold(0usize, |acc, field| acc.saturating_add(field.ty.head_size())),
            _ => WORD,
        }
    }

    /// Canonical type string used for selector hashing
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{bits}"),
            AbiType::Int(bits) => write!(f, "int{bits}"),
            AbiType::Address => f.write_str("address"),
            AbiType::Bool => f.write_str("bool"),
            AbiType::FixedBytes(len) => write!(f, "bytes{len}"),
            AbiType::Bytes => f.write_str("bytes"),
            AbiType::String => f.write_str("string"),
            AbiType::FixedArray(inner, len) => write!(f, "{inner}[{len}]"),
            AbiType::Array(inner) => write!(f, "{inner}[]"),
            AbiType::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn parse_type(ty: &str, depth: usize) -> Result<AbiType, String> {
    if depth > MAX_NESTING {
        return Err("type nesting too deep".to_string());
    }
    if ty.is_empty() {
        return Err("empty type".to_string());
    }

    let (base, suffix) = split_base(ty)?;
    let dims = parse_dimensions(suffix)?;

    let base = match tuple_body(base) {
        Some(body) => {
            let fields = split_components(body)?
                .into_iter()
                .map(|component| parse_type(component, depth + 1).map(TupleField::unnamed))
                .collect::<Result<Vec<_>, _>>()?;
            AbiType::Tuple(fields)
        }
        None => parse_elementary(base)?,
    };

    Ok(wrap_dimensions(base, &dims))
}

/// Split `ty` into its base type and the trailing `[..]` dimensions
fn split_base(ty: &str) -> Result<(&str, &str), String> {
    if ty.starts_with('(') || ty.starts_with("tuple(") {
        let open = ty.find('(').unwrap_or(0);
        let close = matching_paren(ty, open)?;
        return Ok(ty.split_at(close + 1));
    }
    match ty.find('[') {
        Some(pos) => Ok(ty.split_at(pos)),
        None => Ok((ty, "")),
    }
}

fn matching_paren(ty: &str, open: usize) -> Result<usize, String> {
    let mut depth = 0usize;
    for (pos, c) in ty.char_indices().skip_while(|(pos, _)| *pos < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos);
                }
            }
            _ => {}
        }
    }
    Err("unbalanced parentheses".to_string())
}

fn tuple_body(base: &str) -> Option<&str> {
    let base = base.strip_prefix("tuple").unwrap_or(base);
    base.strip_prefix('(')?.strip_suffix(')')
}

/// Split a tuple body on its top-level commas
fn split_components(body: &str) -> Result<Vec<&str>, String> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (pos, c) in body.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unbalanced brackets".to_string());
                }
            }
            ',' if depth == 0 => {
                parts.push(body[start..pos].trim());
                start = pos + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced brackets".to_string());
    }
    parts.push(body[start..].trim());

    if parts.iter().any(|part| part.is_empty()) {
        return Err("empty tuple component".to_string());
    }
    Ok(parts)
}

/// Parse a run of `[N]` / `[]` suffixes, outermost last
fn parse_dimensions(suffix: &str) -> Result<Vec<Option<usize>>, String> {
    let mut dims = Vec::new();
    let mut rest = suffix.trim();
    while !rest.is_empty() {
        let body = rest
            .strip_prefix('[')
            .ok_or_else(|| format!("unexpected `{rest}` after type"))?;
        let close = body
            .find(']')
            .ok_or_else(|| "unbalanced brackets".to_string())?;
        let len = &body[..close];
        if len.is_empty() {
            dims.push(None);
        } else {
            if !len.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("array length `{len}` is not a number"));
            }
            let len: usize = len
                .parse()
                .map_err(|_| format!("array length `{len}` is out of range"))?;
            if len == 0 {
                return Err("fixed array length must be positive".to_string());
            }
            dims.push(Some(len));
        }
        rest = &body[close + 1..];
    }
    Ok(dims)
}

fn wrap_dimensions(mut ty: AbiType, dims: &[Option<usize>]) -> AbiType {
    for dim in dims {
        ty = match dim {
            Some(len) => AbiType::FixedArray(Box::new(ty), *len),
            None => AbiType::Array(Box::new(ty)),
        };
    }
    ty
}

fn parse_elementary(name: &str) -> Result<AbiType, String> {
    match name {
        "address" => return Ok(AbiType::Address),
        "bool" => return Ok(AbiType::Bool),
        "string" => return Ok(AbiType::String),
        "bytes" => return Ok(AbiType::Bytes),
        "uint" => return Ok(AbiType::Uint(256)),
        "int" => return Ok(AbiType::Int(256)),
        _ => {}
    }

    if let Some(bits) = name.strip_prefix("uint") {
        return parse_bits(bits).map(AbiType::Uint);
    }
    if let Some(bits) = name.strip_prefix("int") {
        return parse_bits(bits).map(AbiType::Int);
    }
    if let Some(len) = name.strip_prefix("bytes") {
        let len = parse_number(len).filter(|len| (1..=32).contains(len));
        return len
            .map(AbiType::FixedBytes)
            .ok_or_else(|| format!("`{name}`: fixed bytes length must be 1..=32"));
    }

    Err(format!("unknown base type `{name}`"))
}

fn parse_bits(bits: &str) -> Result<usize, String> {
    parse_number(bits)
        .filter(|bits| *bits % 8 == 0 && (8..=256).contains(bits))
        .ok_or_else(|| format!("integer width `{bits}` must be a multiple of 8 in 8..=256"))
}

fn parse_number(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
