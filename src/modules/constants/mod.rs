//! `axe constants` - frequently used EVM constants

use alloy_primitives::U256;
use clap::Subcommand;

use crate::modules::export::Table;

/// Which constants to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ConstantKind {
    /// Max decimal and hex values of common uint types
    Uint,
    /// Standard Ethereum addresses: zero, burn, and precompiles
    Address,
    /// Zero and max values for common fixed-size byte types
    Bytes,
    /// ETH units and their equivalent values in wei and ether
    EthUnits,
    /// Chain IDs of major EVM chains
    #[command(name = "chainid")]
    ChainId,
    /// Gas costs for EVM opcodes, transactions, calldata, and storage operations
    Gas,
    /// All EVM related constants in one view
    All,
}

const UINT_BITS: &[usize] = &[8, 16, 24, 32, 40, 48, 64, 96, 160, 256];

const ADDRESSES: &[(&str, &str, &str)] = &[
    (
        "Zero Address",
        "0x0000000000000000000000000000000000000000",
        "Default zero address",
    ),
    (
        "Burn Address",
        "0x000000000000000000000000000000000000dEaD",
        "Used to burn tokens permanently",
    ),
    (
        "ecrecover (0x01)",
        "0x0000000000000000000000000000000000000001",
        "Elliptic curve digital signature recovery",
    ),
    (
        "sha256 (0x02)",
        "0x0000000000000000000000000000000000000002",
        "SHA-256 hash function",
    ),
    (
        "ripemd160 (0x03)",
        "0x0000000000000000000000000000000000000003",
        "RIPEMD-160 hash function",
    ),
    (
        "identity (0x04)",
        "0x0000000000000000000000000000000000000004",
        "Returns input unmodified",
    ),
    (
        "modexp (0x05)",
        "0x0000000000000000000000000000000000000005",
        "Modular exponentiation (big integers)",
    ),
    (
        "bn128Add (0x06)",
        "0x0000000000000000000000000000000000000006",
        "Addition on alt_bn128 elliptic curve",
    ),
    (
        "bn128Mul (0x07)",
        "0x0000000000000000000000000000000000000007",
        "Multiplication on alt_bn128 elliptic curve",
    ),
    (
        "bn128Pairing (0x08)",
        "0x0000000000000000000000000000000000000008",
        "Pairing check on alt_bn128 curve",
    ),
    (
        "blake2f (0x09)",
        "0x0000000000000000000000000000000000000009",
        "BLAKE2b compression function",
    ),
];

const BYTES_LENGTHS: &[usize] = &[1, 4, 20, 32];

/// Unit name and its power of ten in wei
const ETH_UNITS: &[(&str, u32)] = &[
    ("wei", 0),
    ("gwei", 9),
    ("szabo", 12),
    ("finney", 15),
    ("ether", 18),
];

const CHAIN_IDS: &[(&str, u64)] = &[
    ("Ethereum Mainnet", 1),
    ("Sepolia Testnet", 11155111),
    ("Holesky Testnet", 17000),
    ("Polygon Mainnet", 137),
    ("Polygon Amoy Testnet", 80002),
    ("Polygon zkEVM", 1101),
    ("Polygon zkEVM Testnet", 1442),
    ("BNB Smart Chain Mainnet", 56),
    ("BNB Smart Chain Testnet", 97),
    ("Arbitrum One", 42161),
    ("Arbitrum Nova", 42170),
    ("Arbitrum Sepolia", 421614),
    ("Optimism", 10),
    ("Optimism Sepolia", 11155420),
    ("Base", 8453),
    ("Base Sepolia", 84532),
    ("Avalanche C-Chain", 43114),
    ("Avalanche Fuji Testnet", 43113),
    ("Fantom Opera", 250),
    ("Fantom Testnet", 4002),
    ("Cronos Mainnet", 25),
    ("Cronos Testnet", 338),
    ("Gnosis", 100),
    ("Gnosis Chiado Testnet", 10200),
    ("Moonbeam", 1284),
    ("Moonriver", 1285),
    ("Moonbase Alpha", 1287),
    ("Celo Mainnet", 42220),
    ("Celo Alfajores Testnet", 44787),
    ("Aurora Mainnet", 1313161554),
    ("Aurora Testnet", 1313161555),
    ("Harmony Mainnet Shard 0", 1666600000),
    ("Linea", 59144),
    ("Linea Goerli", 59140),
    ("Mantle", 5000),
    ("Mantle Testnet", 5001),
    ("Scroll", 534352),
    ("Scroll Sepolia", 534351),
    ("zkSync Era", 324),
    ("zkSync Era Sepolia", 300),
    ("Blast", 81457),
    ("Blast Sepolia", 168587773),
    ("Mode", 34443),
    ("Fraxtal", 252),
    ("Metis Andromeda", 1088),
    ("Kava EVM", 2222),
    ("Hardhat Local", 31337),
    ("Ganache Local", 1337),
    ("Anvil Local", 31337),
];

type GasEntry = (&'static str, u64, &'static str);

const GAS_CONSTANTS: &[(&str, &[GasEntry])] = &[
    (
        "Transaction Costs",
        &[("TX_BASE_GAS", 21000, "Base gas cost for a standard ETH transfer")],
    ),
    (
        "Calldata",
        &[
            ("GAS_PER_ZERO_BYTE", 4, "Gas per zero byte in calldata"),
            (
                "GAS_PER_NON_ZERO_BYTE",
                16,
                "Gas per non-zero byte in calldata",
            ),
        ],
    ),
    (
        "Account Access",
        &[
            (
                "ACCESS_LIST_ADDRESS",
                2400,
                "Gas for an address in the access list",
            ),
            (
                "ACCESS_LIST_STORAGE_KEY",
                1900,
                "Gas for a storage key in the access list",
            ),
        ],
    ),
    (
        "Storage",
        &[
            (
                "SLOAD_COLD_GAS",
                2100,
                "Gas cost for reading a cold storage slot",
            ),
            (
                "SLOAD_WARM_GAS",
                100,
                "Gas cost for reading a warm storage slot",
            ),
            (
                "SSTORE_SET_COLD_GAS",
                22100,
                "Setting storage from zero (cold access)",
            ),
            (
                "SSTORE_RESET_COLD_GAS",
                5000,
                "Resetting storage to non-zero (cold access)",
            ),
            (
                "SSTORE_CLEAR_REFUND",
                4800,
                "Refund for clearing storage to zero",
            ),
        ],
    ),
    (
        "Call Operations",
        &[
            (
                "CALL_COLD_ACCOUNT_ACCESS",
                2600,
                "Extra gas for calling a cold account",
            ),
            (
                "CALL_WARM_STORAGE_READ",
                100,
                "Gas for calling a warm account",
            ),
        ],
    ),
    (
        "Contract Creation",
        &[
            (
                "NEW_CONTRACT_CREATION",
                32000,
                "Gas for creating a new smart contract",
            ),
            ("INITCODE_WORD", 2, "Gas per word in initcode"),
        ],
    ),
    (
        "Logging",
        &[
            ("LOG_TOPIC_GAS", 375, "Gas per topic in a LOG"),
            ("LOG_DATA_GAS", 8, "Gas per byte of data in a LOG"),
        ],
    ),
    (
        "Memory",
        &[
            (
                "MEMORY_EXPANSION_LINEAR",
                3,
                "Linear gas cost for memory expansion",
            ),
            (
                "MEMORY_EXPANSION_QUADRATIC_DIVISOR",
                512,
                "Quadratic cost divisor for memory expansion",
            ),
        ],
    ),
    (
        "Opcodes",
        &[
            ("JUMPDEST_GAS", 1, "Gas for JUMPDEST opcode"),
            ("PUSH_GAS", 3, "Gas for PUSH opcode"),
            ("DUP_GAS", 3, "Gas for DUP opcode"),
            ("SWAP_GAS", 3, "Gas for SWAP opcode"),
            ("ADD_GAS", 3, "Gas for ADD opcode"),
            ("MUL_GAS", 5, "Gas for MUL opcode"),
            ("SUB_GAS", 3, "Gas for SUB opcode"),
            ("DIV_GAS", 5, "Gas for DIV opcode"),
            ("SDIV_GAS", 5, "Gas for SDIV opcode"),
            ("EXP_GAS", 10, "Base gas for EXP opcode"),
            ("EXP_BYTE_GAS", 50, "Gas per byte of exponent in EXP"),
            ("SHA3", 30, "Base gas cost for SHA3 opcode"),
            ("SHA3_WORD", 6, "Gas per word hashed with SHA3"),
        ],
    ),
    (
        "Block/Tx Info",
        &[
            ("BLOCKHASH_GAS", 20, "Gas for BLOCKHASH opcode"),
            ("BALANCE_GAS", 700, "Gas for BALANCE opcode"),
            ("EXTCODEHASH_GAS", 700, "Gas for EXTCODEHASH opcode"),
            ("EXTCODESIZE_GAS", 700, "Gas for EXTCODESIZE opcode"),
            ("EXTCODECOPY_GAS", 700, "Gas for EXTCODECOPY opcode"),
        ],
    ),
    (
        "Selfdestruct",
        &[("SELFDESTRUCT_GAS", 5000, "Gas for SELFDESTRUCT")],
    ),
    (
        "Precompiled Contracts",
        &[
            ("ECRECOVER_GAS", 3000, "Gas cost for ecrecover precompile"),
            ("SHA256_GAS", 60, "Base gas for SHA256 precompile"),
            ("SHA256_WORD", 12, "Gas per word for SHA256 precompile"),
            ("RIPEMD160_GAS", 600, "Base gas for RIPEMD160 precompile"),
            (
                "RIPEMD160_WORD",
                120,
                "Gas per word for RIPEMD160 precompile",
            ),
            ("IDENTITY_GAS", 15, "Base gas for IDENTITY precompile"),
            ("IDENTITY_WORD", 3, "Gas per word for IDENTITY precompile"),
        ],
    ),
];

/// Tables for the requested kind, in display order
pub fn tables(kind: ConstantKind) -> Vec<Table> {
    match kind {
        ConstantKind::Uint => vec![uint_table()],
        ConstantKind::Address => vec![address_table()],
        ConstantKind::Bytes => vec![bytes_table()],
        ConstantKind::EthUnits => vec![eth_units_table()],
        ConstantKind::ChainId => vec![chain_id_table()],
        ConstantKind::Gas => gas_tables(),
        ConstantKind::All => {
            let mut all = vec![
                uint_table(),
                address_table(),
                bytes_table(),
                eth_units_table(),
                chain_id_table(),
            ];
            all.extend(gas_tables());
            all
        }
    }
}

/// Largest value of `uint<bits>`
pub fn uint_max(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::from(1u8) << bits) - U256::from(1u8)
    }
}

fn uint_table() -> Table {
    UINT_BITS.iter().fold(
        Table::new("UINT Max Values", &["UINT", "Decimal (Max Value)", "Hex (Max Value)"]),
        |table, bits| {
            let max = uint_max(*bits);
            table.row([format!("uint{bits}"), max.to_string(), format!("{max:#x}")])
        },
    )
}

fn address_table() -> Table {
    ADDRESSES.iter().fold(
        Table::new("Addresses", &["Name", "Address (Ethereum)", "Description"]),
        |table, (name, address, description)| table.row([*name, *address, *description]),
    )
}

fn bytes_table() -> Table {
    BYTES_LENGTHS.iter().fold(
        Table::new("Bytes", &["Bytes", "Zero Value", "Max Value"]),
        |table, len| {
            table.row([
                format!("bytes{len}"),
                format!("0x{}", "00".repeat(*len)),
                format!("0x{}", "ff".repeat(*len)),
            ])
        },
    )
}

/// `1 wei` expressed in ether for a power of ten
fn in_ether(exponent: u32) -> String {
    if exponent >= 18 {
        return U256::from(10u8).pow(U256::from(exponent - 18)).to_string();
    }
    format!("0.{}1", "0".repeat(17 - exponent as usize))
}

fn eth_units_table() -> Table {
    ETH_UNITS.iter().fold(
        Table::new("ETH Units", &["Unit", "Value in Wei", "Value in ETH"]),
        |table, (unit, exponent)| {
            let wei = U256::from(10u8).pow(U256::from(*exponent));
            table.row([
                unit.to_string(),
                format!("{wei} (1e{exponent})"),
                in_ether(*exponent),
            ])
        },
    )
}

fn chain_id_table() -> Table {
    CHAIN_IDS.iter().fold(
        Table::new("Chain IDs", &["Name", "Chain ID"]),
        |table, (name, id)| table.row([name.to_string(), id.to_string()]),
    )
}

fn gas_tables() -> Vec<Table> {
    GAS_CONSTANTS
        .iter()
        .map(|(category, entries)| {
            entries.iter().fold(
                Table::new(
                    format!("Gas: {category}"),
                    &["Operation", "Cost (Gas Units)", "Description"],
                ),
                |table, (name, cost, description)| {
                    table.row([name.to_string(), cost.to_string(), description.to_string()])
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint_maxima() {
        assert_eq!(uint_max(8), U256::from(255u64));
        assert_eq!(uint_max(64), U256::from(u64::MAX));
        assert_eq!(uint_max(256), U256::MAX);

        let table = uint_table();
        assert_eq!(table.rows.len(), UINT_BITS.len());
        assert_eq!(table.rows[2], ["uint24", "16777215", "0xffffff"]);
        assert_eq!(table.rows[9][2], format!("0x{}", "f".repeat(64)));
    }

    #[test]
    fn test_eth_units() {
        let table = eth_units_table();
        assert_eq!(table.rows[0], ["wei", "1 (1e0)", "0.000000000000000001"]);
        assert_eq!(table.rows[1], ["gwei", "1000000000 (1e9)", "0.000000001"]);
        assert_eq!(table.rows[3][2], "0.001");
        assert_eq!(table.rows[4], ["ether", "1000000000000000000 (1e18)", "1"]);
    }

    #[test]
    fn test_bytes_and_addresses() {
        let bytes = bytes_table();
        assert_eq!(bytes.rows[1], ["bytes4", "0x00000000", "0xffffffff"]);

        let addresses = address_table();
        assert_eq!(addresses.rows.len(), 11);
        assert_eq!(addresses.rows[1][1], "0x000000000000000000000000000000000000dEaD");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(tables(ConstantKind::Gas).len(), GAS_CONSTANTS.len());
        assert_eq!(tables(ConstantKind::All).len(), 5 + GAS_CONSTANTS.len());
        let chains = &tables(ConstantKind::ChainId)[0];
        assert!(chains.rows.iter().any(|row| row[0] == "Optimism" && row[1] == "10"));
    }
}
