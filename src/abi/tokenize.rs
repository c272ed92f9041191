//! Parsing of human-readable argument strings into tokens.

use super::{Error, ParamType, Token};
use crate::{
    serialization,
    types::{Address, I256, U256},
};

/// Parses a value of the specified type from a string.
///
/// - `address`: `0x` prefixed hex, 20 bytes;
/// - `uint<N>`/`int<N>`: decimal or `0x` prefixed hex, with a leading `-`
///   allowed for signed decimals;
/// - `bool`: `true`, `false`, `1` or `0`;
/// - `bytes` and `bytes<N>`: `0x` prefixed hex;
/// - `string`: taken verbatim;
/// - arrays: `[a,b,c]`, split on `,` without any nesting or quoting.
pub fn tokenize(kind: &ParamType, value: &str) -> Result<Token, Error> {
    let invalid = |reason: &str| Error::invalid_value(kind, format!("{reason} in {value:?}"));

    let token = match kind {
        ParamType::Address => {
            let bytes = hex(value).map_err(|_| invalid("invalid hex"))?;
            let address = <[u8; 20]>::try_from(bytes).map_err(|_| invalid("expected 20 bytes"))?;
            Token::Address(Address(address))
        }
        ParamType::Bool => match value {
            "true" | "1" => Token::Bool(true),
            "false" | "0" => Token::Bool(false),
            _ => return Err(invalid("invalid bool")),
        },
        ParamType::Uint(_) => Token::Uint(uint(value).ok_or_else(|| invalid("invalid integer"))?),
        ParamType::Int(_) => {
            let int = match value.strip_prefix("0x") {
                Some(_) => uint(value)
                    .map(|value| I256::from_be_bytes(value.to_be_bytes()))
                    .filter(|value| *value >= I256::ZERO),
                None => I256::from_str_radix(value, 10).ok(),
            };
            Token::Int(int.ok_or_else(|| invalid("invalid integer"))?)
        }
        ParamType::FixedBytes(_) => Token::FixedBytes(hex(value).map_err(|_| invalid("invalid hex"))?),
        ParamType::Bytes => Token::Bytes(hex(value).map_err(|_| invalid("invalid hex"))?),
        ParamType::String => Token::String(value.to_owned()),
        ParamType::Array(inner) => Token::Array(elements(inner, value)?),
        ParamType::FixedArray(inner, _) => Token::FixedArray(elements(inner, value)?),
    };

    token.type_check(kind)?;
    Ok(token)
}

fn hex(value: &str) -> Result<Vec<u8>, serialization::HexError> {
    serialization::decode_hex(value)
}

fn uint(value: &str) -> Option<U256> {
    match value.strip_prefix("0x") {
        Some(digits) => U256::from_str_radix(digits, 16).ok(),
        None => U256::from_str_radix(value, 10).ok(),
    }
}

fn elements(inner: &ParamType, value: &str) -> Result<Vec<Token>, Error> {
    let items = value
        .trim()
        .strip_prefix('[')
        .and_then(|value| value.strip_suffix(']'))
        .ok_or_else(|| Error::invalid_value(inner, format!("expected array in {value:?}")))?;
    if items.trim().is_empty() {
        return Ok(Vec::new());
    }
    items
        .split(',')
        .map(|item| tokenize(inner, item.trim()))
        .collect()
}
