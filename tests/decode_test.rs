//! Calldata decoding against alloy's reference encoder

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::Function;
use alloy_primitives::{address, Address, B256, I256, U256};
use alloy_sol_types::{sol, SolCall};

use axe::domain::abi::{
    AbiDocument, AbiError, AbiRegistry, AbiType, DecodedValue, FunctionEntry, WORD,
};

sol! {
    function transfer(address to, uint256 value) external returns (bool);
}

const VITALIK: Address = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");

const ERC20_ABI: &str = r#"[
    {"type":"function","name":"transfer","inputs":[
        {"name":"to","type":"address"},{"name":"value","type":"uint256"}],
     "outputs":[{"name":"","type":"bool"}]},
    {"type":"function","name":"approve","inputs":[
        {"name":"spender","type":"address"},{"name":"value","type":"uint256"}]},
    {"type":"function","name":"deposit","inputs":[]}
]"#;

fn erc20() -> AbiRegistry {
    AbiRegistry::from_document(&AbiDocument::from_json_str(ERC20_ABI).unwrap())
}

/// Calldata for `signature` with `args` encoded by alloy
fn encode_call(signature: &str, args: Vec<DynSolValue>) -> (FunctionEntry, Vec<u8>) {
    let entry = FunctionEntry::parse_signature(signature).unwrap();
    let mut calldata = entry.selector().to_vec();
    calldata.extend(DynSolValue::Tuple(args).abi_encode_params());
    (entry, calldata)
}

fn expected(value: &DynSolValue) -> DecodedValue {
    match value {
        DynSolValue::Bool(b) => DecodedValue::Bool(*b),
        DynSolValue::Int(i, _) => DecodedValue::Int(*i),
        DynSolValue::Uint(u, _) => DecodedValue::Uint(*u),
        DynSolValue::FixedBytes(word, size) => DecodedValue::FixedBytes(word[..*size].to_vec()),
        DynSolValue::Address(a) => DecodedValue::Address(*a),
        DynSolValue::Bytes(b) => DecodedValue::Bytes(b.clone()),
        DynSolValue::String(s) => DecodedValue::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            DecodedValue::Array(items.iter().map(expected).collect())
        }
        DynSolValue::Tuple(items) => {
            DecodedValue::Tuple(items.iter().map(|item| (None, expected(item))).collect())
        }
        other => panic!("unsupported test value: {other:?}"),
    }
}

fn uint(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}

#[test]
fn test_transfer_matches_expected_json() {
    let calldata = transferCall {
        to: VITALIK,
        value: U256::from(1),
    }
    .abi_encode();

    let call = erc20().decode(&calldata).unwrap();
    assert_eq!(call.signature(), "transfer(address,uint256)");
    assert_eq!(
        serde_json::to_string(&call.parameter_map()).unwrap(),
        r#"{"to":"0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045","value":1}"#
    );
}

#[test]
fn test_selectors_agree_with_alloy() {
    for signature in [
        "transfer(address,uint256)",
        "deposit()",
        "multicall(bytes[])",
        "fill((address,uint256[2],(address,bytes))[],uint64)",
        "swap(int24,bytes32,string[3][])",
    ] {
        let ours = FunctionEntry::parse_signature(signature).unwrap();
        let theirs = Function::parse(signature).unwrap();
        assert_eq!(ours.signature(), theirs.signature(), "{signature}");
        assert_eq!(ours.selector(), theirs.selector().0, "{signature}");
    }
}

#[test]
fn test_hello_string_has_no_padding() {
    let (entry, calldata) = encode_call("greet(string)", vec![DynSolValue::String("hello".into())]);
    let registry = AbiRegistry::from_document(&AbiDocument::new(vec![entry]));

    let call = registry.decode(&calldata).unwrap();
    assert_eq!(call.parameters[0], ("arg0".to_string(), DecodedValue::String("hello".into())));
}

#[test]
fn test_nested_values_match_reference_encoder() {
    let args = vec![
        DynSolValue::Array(vec![
            DynSolValue::Tuple(vec![uint(1), DynSolValue::Bytes(vec![0xde, 0xad])]),
            DynSolValue::Tuple(vec![uint(2), DynSolValue::Bytes(vec![0x42; 40])]),
        ]),
        DynSolValue::FixedArray(vec![
            DynSolValue::String("left".into()),
            DynSolValue::String(String::new()),
        ]),
        DynSolValue::Array(vec![
            DynSolValue::FixedArray(vec![uint(3), uint(4)]),
            DynSolValue::FixedArray(vec![uint(5), uint(6)]),
        ]),
        DynSolValue::Array(vec![DynSolValue::Bytes(vec![]), DynSolValue::Bytes(vec![7; 33])]),
        DynSolValue::Int(I256::try_from(-5i64).unwrap(), 8),
        DynSolValue::Tuple(vec![
            DynSolValue::Bool(true),
            DynSolValue::FixedBytes(B256::repeat_byte(0x11), 4),
            DynSolValue::Address(VITALIK),
        ]),
    ];
    let (entry, calldata) = encode_call(
        "f((uint256,bytes)[],string[2],uint256[2][],bytes[],int8,(bool,bytes4,address))",
        args.clone(),
    );

    let registry = AbiRegistry::from_document(&AbiDocument::new(vec![entry]));
    let call = registry.decode(&calldata).unwrap();

    let decoded: Vec<DecodedValue> = call.parameters.iter().map(|(_, v)| v.clone()).collect();
    let wanted: Vec<DecodedValue> = args.iter().map(expected).collect();
    assert_eq!(decoded, wanted);
    assert_eq!(call.consumed, calldata.len() - 4);
}

#[test]
fn test_static_inputs_consume_only_head_slots() {
    let args = vec![
        uint(7),
        DynSolValue::Address(VITALIK),
        DynSolValue::Bool(false),
        DynSolValue::FixedBytes(B256::repeat_byte(0xab), 32),
        DynSolValue::Int(I256::MINUS_ONE, 8),
    ];
    let (entry, calldata) = encode_call("f(uint256,address,bool,bytes32,int8)", args);

    let call = axe::domain::abi::decode_calldata(&entry, &calldata).unwrap();
    assert_eq!(call.parameters.len(), 5);
    assert_eq!(call.consumed, 5 * WORD);
}

#[test]
fn test_dynamic_array_decodes_every_element() {
    let items: Vec<DynSolValue> = (0..5).map(|i| uint(i * 10)).collect();
    let (entry, calldata) = encode_call("f(uint256[])", vec![DynSolValue::Array(items)]);

    let call = axe::domain::abi::decode_calldata(&entry, &calldata).unwrap();
    let DecodedValue::Array(decoded) = &call.parameters[0].1 else {
        panic!("expected an array");
    };
    assert_eq!(decoded.len(), 5);
    assert_eq!(decoded[4], DecodedValue::Uint(U256::from(40)));
}

#[test]
fn test_decoding_is_idempotent() {
    let calldata = transferCall {
        to: VITALIK,
        value: U256::MAX,
    }
    .abi_encode();
    let registry = erc20();
    assert_eq!(registry.decode(&calldata).unwrap(), registry.decode(&calldata).unwrap());
}

#[test]
fn test_short_calldata_is_malformed() {
    assert!(matches!(
        erc20().decode(&[0xa9, 0x05, 0x9c]),
        Err(AbiError::MalformedCalldata(_))
    ));
}

#[test]
fn test_selector_only_call_has_no_parameters() {
    let call = erc20().decode(&[0xd0, 0xe3, 0x0d, 0xb0]).unwrap();
    assert_eq!(call.signature(), "deposit()");
    assert!(call.parameters.is_empty());
    assert_eq!(serde_json::to_string(&call.parameter_map()).unwrap(), "{}");
}

#[test]
fn test_unknown_selector() {
    let err = erc20().decode(&[0xde, 0xad, 0xbe, 0xef, 0, 0]).unwrap_err();
    assert_eq!(
        err,
        AbiError::SelectorNotFound {
            selector: "0xdeadbeef".to_string(),
            candidates: 3,
        }
    );
}

#[test]
fn test_offset_beyond_region_is_invalid() {
    let (entry, mut calldata) =
        encode_call("greet(string)", vec![DynSolValue::String("hello".into())]);
    // Point the string's head slot far past the end
    calldata[4 + 30] = 0x10;
    let err = axe::domain::abi::decode_calldata(&entry, &calldata).unwrap_err();
    assert!(matches!(err, AbiError::InvalidOffset { index: 0, .. }), "{err:?}");
}

#[test]
fn test_truncated_argument_names_parameter() {
    let calldata = transferCall {
        to: VITALIK,
        value: U256::from(1),
    }
    .abi_encode();
    let err = erc20().decode(&calldata[..calldata.len() - 1]).unwrap_err();
    match err {
        AbiError::TruncatedCalldata { index, name, offset, .. } => {
            assert_eq!(index, 1);
            assert_eq!(name, "value");
            assert_eq!(offset, WORD);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_type_round_trip() {
    let types = [
        "uint8",
        "int256",
        "bytes32",
        "address[]",
        "(uint256,(bytes,string)[])[3]",
        "bool[2][]",
    ];
    for ty in types {
        assert_eq!(AbiType::parse(ty).unwrap().canonical(), ty);
    }
    assert_eq!(AbiType::parse("uint").unwrap().canonical(), "uint256");
}
