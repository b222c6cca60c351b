//! `axe`: EVM calldata decoding and constant lookups

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod modules;
pub mod store;

pub use error::{Error, Result, SourceError};
