//! ABI head/tail encoding.

use super::{Error, ParamType, Token};
use crate::types::U256;

/// Encodes values for the specified parameter types.
///
/// Every token is checked against its type first, so the output is always a
/// valid encoding that [`super::decode`] accepts.
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, Error> {
    if types.len() != tokens.len() {
        return Err(Error::ArityMismatch {
            expected: types.len(),
            actual: tokens.len(),
        });
    }
    for (kind, token) in types.iter().zip(tokens) {
        token.type_check(kind)?;
    }

    let mut buffer = Vec::new();
    encode_sequence(&mut buffer, types.iter().zip(tokens));
    Ok(buffer)
}

/// Encodes a sequence of already type checked values: heads first, then the
/// tails of the dynamic values in order.
fn encode_sequence<'a>(
    buffer: &mut Vec<u8>,
    values: impl Iterator<Item = (&'a ParamType, &'a Token)> + Clone,
) {
    let heads = values
        .clone()
        .map(|(kind, token)| head_len(kind, token))
        .sum::<usize>();

    let mut tail = Vec::new();
    for (kind, token) in values {
        if kind.is_dynamic() {
            buffer.extend_from_slice(&word(heads + tail.len()));
            encode_token(&mut tail, kind, token);
        } else {
            encode_token(buffer, kind, token);
        }
    }
    buffer.extend_from_slice(&tail);
}

/// Size of a type checked value in the head.
fn head_len(kind: &ParamType, token: &Token) -> usize {
    match (kind, token) {
        (ParamType::FixedArray(inner, _), Token::FixedArray(tokens)) if !inner.is_dynamic() => {
            tokens.iter().map(|token| head_len(inner, token)).sum()
        }
        _ => 32,
    }
}

fn encode_token(buffer: &mut Vec<u8>, kind: &ParamType, token: &Token) {
    match token {
        Token::Address(address) => {
            let mut word = [0; 32];
            word[12..].copy_from_slice(&address.0);
            buffer.extend_from_slice(&word);
        }
        Token::Uint(value) => buffer.extend_from_slice(&value.to_be_bytes()),
        Token::Int(value) => buffer.extend_from_slice(&value.to_be_bytes()),
        Token::Bool(value) => buffer.extend_from_slice(&word(*value as usize)),
        Token::FixedBytes(bytes) => padded(buffer, bytes),
        Token::Bytes(bytes) => {
            buffer.extend_from_slice(&word(bytes.len()));
            padded(buffer, bytes);
        }
        Token::String(value) => {
            buffer.extend_from_slice(&word(value.len()));
            padded(buffer, value.as_bytes());
        }
        Token::Array(tokens) => {
            buffer.extend_from_slice(&word(tokens.len()));
            encode_elements(buffer, kind, tokens);
        }
        Token::FixedArray(tokens) => encode_elements(buffer, kind, tokens),
    }
}

fn encode_elements(buffer: &mut Vec<u8>, kind: &ParamType, tokens: &[Token]) {
    let inner = match kind {
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => &**inner,
        kind => kind,
    };
    encode_sequence(buffer, tokens.iter().map(|token| (inner, token)));
}

/// Appends bytes right-padded with zeros to a multiple of 32.
fn padded(buffer: &mut Vec<u8>, bytes: &[u8]) {
    buffer.extend_from_slice(bytes);
    let rem = bytes.len() % 32;
    if rem != 0 {
        buffer.resize(buffer.len() + 32 - rem, 0);
    }
}

fn word(value: usize) -> [u8; 32] {
    U256::new(value as u128).to_be_bytes()
}
