//! ABI infrastructure - ABI files and block-explorer lookups

mod cached;
mod explorer;
mod scanner;

pub use cached::CachedAbiSource;
pub use explorer::{AbiSource, EtherscanClient, SourcifyClient};
pub use scanner::AbiScanner;
