//! Solidity ABI encoding for contract function calls.
//!
//! This module provides:
//! - parsing of function signatures such as `transfer(address,uint256)`;
//! - the 4-byte function selector;
//! - head/tail encoding of arguments and the strict inverse decoding;
//! - tokenizing of human-readable argument strings.
//!
//! ```
//! use ethjsonrpc::abi::{self, ParamType, Token};
//! use ethjsonrpc::types::{Address, U256};
//!
//! let data = abi::encode_function_call(
//!     "transfer(address,uint256)",
//!     &[Token::Address(Address([0x11; 20])), Token::Uint(U256::new(1000))],
//! )
//! .unwrap();
//! assert_eq!(data[..4], [0xa9, 0x05, 0x9c, 0xbb]);
//!
//! let tokens = abi::decode(&[ParamType::Uint(256)], &data[36..]).unwrap();
//! assert_eq!(tokens, [Token::Uint(U256::new(1000))]);
//! ```
//!
//! Tuple types are not supported: a signature's parameter list ends at the
//! first `)`.

mod decode;
mod encode;
mod signature;
mod tokenize;
mod types;

pub use self::{
    decode::decode,
    encode::encode,
    signature::{
        encode_function_call, encode_function_call_str, encode_function_call_with,
        parse_signature, selector, SelectorEncoding,
    },
    tokenize::tokenize,
    types::{ParamType, Token},
};
use thiserror::Error;

/// An ABI encoding or decoding error.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The signature is missing `(` or `)`, or they are out of order.
    #[error("malformed function signature {0:?}")]
    MalformedSignature(String),

    /// The number of values does not match the number of parameter types.
    #[error("expected {expected} arguments but got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// The type is not part of the supported ABI type system.
    #[error("unsupported ABI type {0:?}")]
    UnsupportedType(String),

    /// A value does not fit its declared type.
    #[error("invalid value for {kind}: {reason}")]
    InvalidValue { kind: String, reason: String },

    /// Encoded data is truncated or not canonically encoded.
    #[error("invalid ABI data: {0}")]
    InvalidData(String),
}

impl Error {
    fn invalid_value(kind: &ParamType, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData(reason.into())
    }
}
