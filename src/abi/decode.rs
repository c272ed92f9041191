//! Strict ABI decoding.

use super::{Error, ParamType, Token};
use crate::types::{Address, I256, U256};

/// Decodes ABI encoded data into values of the specified types.
///
/// Decoding is strict: truncated data, offsets or lengths pointing outside of
/// the data, non-canonical padding of `address`, `bool` and integer words, and
/// strings that are not UTF-8 are all rejected.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, Error> {
    decode_sequence(types.iter(), data)
}

/// Decodes a head/tail sequence; offsets are relative to the start of `data`.
fn decode_sequence<'a>(
    types: impl Iterator<Item = &'a ParamType>,
    data: &[u8],
) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut head = 0;
    for kind in types {
        if kind.is_dynamic() {
            let offset = read_len(data, head)?;
            let tail = data
                .get(offset..)
                .ok_or_else(|| Error::invalid_data(format!("offset {offset} out of range")))?;
            tokens.push(decode_token(kind, tail)?);
            head += 32;
        } else {
            let value = data
                .get(head..)
                .ok_or_else(|| Error::invalid_data("truncated data"))?;
            tokens.push(decode_token(kind, value)?);
            head = kind
                .head_len()
                .and_then(|len| head.checked_add(len))
                .ok_or_else(|| Error::invalid_data(format!("{kind} head out of range")))?;
        }
    }
    Ok(tokens)
}

fn decode_token(kind: &ParamType, data: &[u8]) -> Result<Token, Error> {
    match kind {
        ParamType::Address => {
            let word = read_word(data, 0)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(Error::invalid_data("address with dirty upper bytes"));
            }
            let mut address = [0; 20];
            address.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address(address)))
        }
        ParamType::Bool => match U256::from_be_bytes(read_word(data, 0)?) {
            value if value == U256::ZERO => Ok(Token::Bool(false)),
            value if value == U256::ONE => Ok(Token::Bool(true)),
            value => Err(Error::invalid_data(format!("invalid bool {value}"))),
        },
        ParamType::Uint(_) => {
            let token = Token::Uint(U256::from_be_bytes(read_word(data, 0)?));
            canonical(token, kind)
        }
        ParamType::Int(_) => {
            let token = Token::Int(I256::from_be_bytes(read_word(data, 0)?));
            canonical(token, kind)
        }
        ParamType::FixedBytes(len) => Ok(Token::FixedBytes(read_word(data, 0)?[..*len].to_vec())),
        ParamType::Bytes => read_bytes(data).map(|bytes| Token::Bytes(bytes.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data)?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|_| Error::invalid_data("string is not UTF-8"))
        }
        ParamType::Array(inner) => {
            let len = read_len(data, 0)?;
            let elements = &data[32..];
            if inner
                .head_len()
                .and_then(|size| size.checked_mul(len))
                .map_or(true, |size| size > elements.len())
            {
                return Err(Error::invalid_data(format!(
                    "array length {len} out of range"
                )));
            }
            decode_sequence(std::iter::repeat(&**inner).take(len), elements).map(Token::Array)
        }
        ParamType::FixedArray(inner, len) => {
            decode_sequence(std::iter::repeat(&**inner).take(*len), data).map(Token::FixedArray)
        }
    }
}

/// Rejects integers that were not sign or zero extended to the full word.
fn canonical(token: Token, kind: &ParamType) -> Result<Token, Error> {
    token
        .type_check(kind)
        .map_err(|_| Error::invalid_data(format!("non-canonical {kind} word")))?;
    Ok(token)
}

fn read_word(data: &[u8], at: usize) -> Result<[u8; 32], Error> {
    data.get(at..)
        .and_then(|data| data.get(..32))
        .and_then(|word| word.try_into().ok())
        .ok_or_else(|| Error::invalid_data("truncated data"))
}

/// Reads a word used as an offset or length.
fn read_len(data: &[u8], at: usize) -> Result<usize, Error> {
    let word = read_word(data, at)?;
    let value = U256::from_be_bytes(word);
    if word[..24].iter().any(|b| *b != 0) {
        return Err(Error::invalid_data(format!("length {value} out of range")));
    }
    let mut low = [0; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low))
        .map_err(|_| Error::invalid_data(format!("length {value} out of range")))
}

/// Reads a length prefixed byte string.
fn read_bytes(data: &[u8]) -> Result<&[u8], Error> {
    let len = read_len(data, 0)?;
    data[32..]
        .get(..len)
        .ok_or_else(|| Error::invalid_data(format!("byte length {len} out of range")))
}
