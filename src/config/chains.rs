//! Chains `axe calldata` can talk to

use std::fmt;

use crate::error::SourceError;

/// A supported EVM chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    /// CLI name, lowercase (e.g. "op-mainnet")
    pub name: &'static str,
    pub chain_id: u64,
    /// Environment variable holding the RPC endpoint
    pub rpc_env: &'static str,
}

pub const CHAINS: &[Chain] = &[
    Chain {
        name: "ethereum",
        chain_id: 1,
        rpc_env: "ETHEREUM_RPC_URL",
    },
    Chain {
        name: "eth-sepolia",
        chain_id: 11_155_111,
        rpc_env: "ETH_SEPOLIA_RPC_URL",
    },
    Chain {
        name: "op-mainnet",
        chain_id: 10,
        rpc_env: "OP_MAINNET_RPC_URL",
    },
    Chain {
        name: "op-sepolia",
        chain_id: 11_155_420,
        rpc_env: "OP_SEPOLIA_RPC_URL",
    },
    Chain {
        name: "arbitrum",
        chain_id: 42_161,
        rpc_env: "ARBITRUM_RPC_URL",
    },
    Chain {
        name: "arb-sepolia",
        chain_id: 421_614,
        rpc_env: "ARB_SEPOLIA_RPC_URL",
    },
    Chain {
        name: "base",
        chain_id: 8_453,
        rpc_env: "BASE_RPC_URL",
    },
    Chain {
        name: "base-sepolia",
        chain_id: 84_532,
        rpc_env: "BASE_SEPOLIA_RPC_URL",
    },
    Chain {
        name: "avalanche",
        chain_id: 43_114,
        rpc_env: "AVALANCHE_RPC_URL",
    },
    Chain {
        name: "avalanche-fuji",
        chain_id: 43_113,
        rpc_env: "AVALANCHE_FUJI_RPC_URL",
    },
    Chain {
        name: "polygon",
        chain_id: 137,
        rpc_env: "POLYGON_RPC_URL",
    },
    Chain {
        name: "polygon-amoy",
        chain_id: 80_002,
        rpc_env: "POLYGON_AMOY_RPC_URL",
    },
];

impl Chain {
    /// Look up a chain by CLI name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> Result<Chain, SourceError> {
        let wanted = name.trim().to_ascii_lowercase();
        CHAINS
            .iter()
            .find(|chain| chain.name == wanted)
            .copied()
            .ok_or_else(|| SourceError::UnsupportedChain(name.trim().to_string()))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chain id {})", self.name, self.chain_id)
    }
}

pub fn supported_names() -> String {
    CHAINS
        .iter()
        .map(|chain| chain.name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        let chain = Chain::from_name(" Base-Sepolia ").unwrap();
        assert_eq!(chain.chain_id, 84_532);
        assert_eq!(chain.rpc_env, "BASE_SEPOLIA_RPC_URL");
    }

    #[test]
    fn test_optimism_ids() {
        assert_eq!(Chain::from_name("op-mainnet").unwrap().chain_id, 10);
        assert_eq!(Chain::from_name("op-sepolia").unwrap().chain_id, 11_155_420);
    }

    #[test]
    fn test_unknown_chain() {
        let err = Chain::from_name("solana").unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedChain(ref name) if name == "solana"));
        assert!(err.to_string().contains("polygon-amoy"));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = CHAINS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CHAINS.len());
    }
}
