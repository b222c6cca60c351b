//! ABI domain models
//!
//! Type grammar, function entries, the calldata decoder and the selector registry.
//! Nothing here performs I/O; sources of ABIs and calldata live in `infrastructure`.

mod decoder;
mod error;
mod function;
mod registry;
mod types;
mod value;

pub use decoder::{decode_arguments, decode_calldata, DecodedCall};
pub use error::AbiError;
pub use function::{AbiDocument, FunctionEntry, Param, SELECTOR_LEN};
pub use registry::AbiRegistry;
pub use types::{AbiType, TupleField, WORD};
pub use value::{DecodedValue, ParameterMap};
