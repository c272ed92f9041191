//! ABI parameter types and value tokens.

use super::Error;
use crate::types::{Address, I256, U256};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// An ABI parameter type.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ParamType {
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `uint<N>`, with the bit width.
    Uint(usize),
    /// `int<N>`, with the bit width.
    Int(usize),
    /// `bytes<N>`, with the byte length.
    FixedBytes(usize),
    /// `bytes`
    Bytes,
    /// `string`
    String,
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[k]`
    FixedArray(Box<ParamType>, usize),
}

impl ParamType {
    /// Returns `true` if values of this type are encoded in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes | Self::String | Self::Array(_) => true,
            Self::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Number of bytes a value of this type takes up in the head, `None` if
    /// it does not fit in a `usize`.
    pub(super) fn head_len(&self) -> Option<usize> {
        match self {
            Self::FixedArray(inner, len) if !inner.is_dynamic() => {
                inner.head_len()?.checked_mul(*len)
            }
            _ => Some(32),
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::FixedBytes(len) => write!(f, "bytes{len}"),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::FixedArray(inner, len) => write!(f, "{inner}[{len}]"),
        }
    }
}

impl FromStr for ParamType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || Error::UnsupportedType(s.to_owned());

        if let Some(rest) = s.strip_suffix(']') {
            let open = rest.rfind('[').ok_or_else(unsupported)?;
            let inner = rest[..open].parse::<ParamType>().map_err(|_| unsupported())?;
            let dimension = &rest[open + 1..];
            if dimension.is_empty() {
                return Ok(Self::Array(Box::new(inner)));
            }
            return match size(dimension) {
                Some(len) if len > 0 => Ok(Self::FixedArray(Box::new(inner), len)),
                _ => Err(unsupported()),
            };
        }

        match s {
            "address" => return Ok(Self::Address),
            "bool" => return Ok(Self::Bool),
            "bytes" => return Ok(Self::Bytes),
            "string" => return Ok(Self::String),
            "uint" => return Ok(Self::Uint(256)),
            "int" => return Ok(Self::Int(256)),
            _ => {}
        }

        let integer = |bits: &str| match size(bits) {
            Some(bits) if bits % 8 == 0 && (8..=256).contains(&bits) => Some(bits),
            _ => None,
        };
        if let Some(bits) = s.strip_prefix("uint") {
            return integer(bits).map(Self::Uint).ok_or_else(unsupported);
        }
        if let Some(bits) = s.strip_prefix("int") {
            return integer(bits).map(Self::Int).ok_or_else(unsupported);
        }
        if let Some(len) = s.strip_prefix("bytes") {
            return match size(len) {
                Some(len) if (1..=32).contains(&len) => Ok(Self::FixedBytes(len)),
                _ => Err(unsupported()),
            };
        }

        Err(unsupported())
    }
}

/// Parses a plain decimal size, rejecting signs and leading zeros.
fn size(digits: &str) -> Option<usize> {
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}

/// An ABI value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    Int(I256),
    Bool(bool),
    /// Value of a `bytes<N>`, exactly `N` bytes long.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Token>),
    FixedArray(Vec<Token>),
}

impl Token {
    /// Checks that the token is a valid value of the specified type.
    pub fn type_check(&self, kind: &ParamType) -> Result<(), Error> {
        match (kind, self) {
            (ParamType::Address, Token::Address(_))
            | (ParamType::Bool, Token::Bool(_))
            | (ParamType::Bytes, Token::Bytes(_))
            | (ParamType::String, Token::String(_)) => Ok(()),
            (ParamType::Uint(bits), Token::Uint(value)) => {
                if *bits < 256 && (*value >> *bits as u32) != U256::ZERO {
                    return Err(Error::invalid_value(kind, format!("{value} out of range")));
                }
                Ok(())
            }
            (ParamType::Int(bits), Token::Int(value)) => {
                if *bits < 256 {
                    let high = *value >> (*bits as u32 - 1);
                    if high != I256::ZERO && high != I256::MINUS_ONE {
                        return Err(Error::invalid_value(kind, format!("{value} out of range")));
                    }
                }
                Ok(())
            }
            (ParamType::FixedBytes(len), Token::FixedBytes(bytes)) => {
                if bytes.len() != *len {
                    return Err(Error::invalid_value(
                        kind,
                        format!("expected {len} bytes but got {}", bytes.len()),
                    ));
                }
                Ok(())
            }
            (ParamType::Array(inner), Token::Array(tokens)) => {
                tokens.iter().try_for_each(|token| token.type_check(inner))
            }
            (ParamType::FixedArray(inner, len), Token::FixedArray(tokens)) => {
                if tokens.len() != *len {
                    return Err(Error::invalid_value(
                        kind,
                        format!("expected {len} elements but got {}", tokens.len()),
                    ));
                }
                tokens.iter().try_for_each(|token| token.type_check(inner))
            }
            _ => Err(Error::invalid_value(kind, format!("mismatched token {self:?}"))),
        }
    }

    pub fn into_address(self) -> Option<Address> {
        match self {
            Self::Address(address) => Some(address),
            _ => None,
        }
    }

    pub fn into_uint(self) -> Option<U256> {
        match self {
            Self::Uint(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<I256> {
        match self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the bytes of a `bytes` or `bytes<N>` value.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(bytes) | Self::FixedBytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements of a `T[]` or `T[k]` value.
    pub fn into_array(self) -> Option<Vec<Token>> {
        match self {
            Self::Array(tokens) | Self::FixedArray(tokens) => Some(tokens),
            _ => None,
        }
    }
}
