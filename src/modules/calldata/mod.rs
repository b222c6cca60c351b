//! `axe calldata` - decode calldata and compute selectors

mod source;

use std::io::Write;

use crate::domain::abi::{AbiError, AbiRegistry, DecodedCall, FunctionEntry};
use crate::modules::export::ToolResult;

pub use source::{parse_hex_bytes, DataSource, DecodeInput, Origin, SourceSelectors};

/// Resolve the selector against the input's ABI and decode the arguments
pub fn decode(input: &DecodeInput) -> Result<DecodedCall, AbiError> {
    AbiRegistry::from_document(&input.abi).decode(&input.calldata)
}

/// Canonical signature and selector of a human-readable function signature
pub fn selector(signature: &str) -> Result<ToolResult, AbiError> {
    let function = FunctionEntry::parse_signature(signature)?;
    Ok(ToolResult::new("Selector")
        .add("signature", function.signature())
        .add("selector", function.selector_hex()))
}

fn heading(origin: &Origin) -> &'static str {
    match origin {
        Origin::Transaction { .. } => "Decoded calldata using transaction hash",
        Origin::Address { .. } => "Decoded calldata using contract address",
        Origin::AbiFile { .. } => "Decoded calldata using contract ABI",
    }
}

/// Print a decoded call: a short summary plus the parameters as pretty JSON,
/// or a single JSON document with `json`
pub fn write_decoded(
    out: &mut impl Write,
    input: &DecodeInput,
    call: &DecodedCall,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, call)?;
        writeln!(out)?;
        return Ok(());
    }

    ToolResult::new(heading(&input.origin))
        .add("source", input.origin.to_string())
        .add("function", call.signature())
        .add("selector", call.function.selector_hex())
        .write_to(out)?;
    writeln!(out)?;
    serde_json::to_writer_pretty(&mut *out, &call.parameter_map())?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::AbiDocument;
    use std::path::PathBuf;

    const ERC20: &str = r#"[
        {"type":"function","name":"transfer","inputs":[
            {"name":"to","type":"address"},{"name":"value","type":"uint256"}]}
    ]"#;

    fn transfer_input() -> DecodeInput {
        let calldata = parse_hex_bytes(concat!(
            "0xa9059cbb",
            "000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045",
            "0000000000000000000000000000000000000000000000000000000000000001"
        ))
        .unwrap();
        DecodeInput {
            calldata,
            abi: AbiDocument::from_json_str(ERC20).unwrap(),
            origin: Origin::AbiFile {
                path: PathBuf::from("erc20.json"),
            },
        }
    }

    #[test]
    fn test_selector_tool() {
        let result = selector("transfer(address, uint)").unwrap();
        assert_eq!(result.content[0].1, "transfer(address,uint256)");
        assert_eq!(result.content[1].1, "0xa9059cbb");
        assert!(selector("nope").is_err());
    }

    #[test]
    fn test_write_decoded_text() {
        let input = transfer_input();
        let call = decode(&input).unwrap();
        let mut out = Vec::new();
        write_decoded(&mut out, &input, &call, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Decoded calldata using contract ABI"));
        assert!(text.contains("transfer(address,uint256)"));
        assert!(text.contains(r#""to": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045""#));
        assert!(text.contains(r#""value": 1"#));
    }

    #[test]
    fn test_write_decoded_json() {
        let input = transfer_input();
        let call = decode(&input).unwrap();
        let mut out = Vec::new();
        write_decoded(&mut out, &input, &call, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["function"], "transfer");
        assert_eq!(value["signature"], "transfer(address,uint256)");
        assert_eq!(value["selector"], "0xa9059cbb");
        assert_eq!(value["parameters"]["value"], 1);
    }
}
