//! JSON serialization helpers for `0x` prefixed hex data.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;

/// Encodes bytes as a `0x` prefixed lowercase hex string.
pub fn encode_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    let mut buffer = String::with_capacity(2 + bytes.len() * 2);
    buffer.push_str("0x");
    for byte in bytes {
        buffer.push(DIGITS[(byte >> 4) as usize] as char);
        buffer.push(DIGITS[(byte & 0xf) as usize] as char);
    }
    buffer
}

/// Decodes a `0x` prefixed hex string.
pub fn decode_hex(hex: &str) -> Result<Vec<u8>, HexError> {
    let digits = hex.strip_prefix("0x").ok_or(HexError::MissingPrefix)?;
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }

    let nibble = |c: u8| match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 0xa),
        b'A'..=b'F' => Ok(c - b'A' + 0xa),
        _ => Err(HexError::InvalidDigit(c as char)),
    };

    digits
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| Ok((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

/// An error parsing hex data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum HexError {
    #[error("hex data missing '0x' prefix")]
    MissingPrefix,
    #[error("odd number of digits in hex data")]
    OddLength,
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

/// Serialize a `[u8]`.
pub mod bytes {
    use super::*;

    #[doc(hidden)]
    pub fn serialize<T, S>(value: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        encode_hex(value.as_ref()).serialize(serializer)
    }

    #[doc(hidden)]
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: From<Vec<u8>>,
        D: Deserializer<'de>,
    {
        let hex = Cow::<str>::deserialize(deserializer)?;
        decode_hex(&hex).map(T::from).map_err(de::Error::custom)
    }
}

/// Serialize an `Option<[u8]>`, skipping it entirely is left to the caller.
pub mod option_bytes {
    use super::*;

    #[doc(hidden)]
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(&encode_hex(value.as_ref())),
            None => serializer.serialize_none(),
        }
    }

    #[doc(hidden)]
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: From<Vec<u8>>,
        D: Deserializer<'de>,
    {
        Option::<Cow<str>>::deserialize(deserializer)?
            .map(|hex| decode_hex(&hex).map(T::from).map_err(de::Error::custom))
            .transpose()
    }
}

/// Serialize a fixed size `[u8; N]`.
pub mod bytearray {
    use super::*;

    #[doc(hidden)]
    pub fn serialize<const N: usize, S>(value: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        bytes::serialize(value, serializer)
    }

    #[doc(hidden)]
    pub fn deserialize<'de, const N: usize, D>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = bytes::deserialize::<Vec<u8>, _>(deserializer)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| de::Error::invalid_length(len, &format!("{N} bytes").as_str()))
    }
}
