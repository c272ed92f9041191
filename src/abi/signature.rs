//! Function signatures, selectors and call data.

use super::{encode, tokenize, Error, ParamType, Token};
use sha3::{Digest as _, Keccak256};

/// How the selector is written for functions without parameters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SelectorEncoding {
    /// Always emit all 4 selector bytes.
    #[default]
    Padded,
    /// Emit the minimal big-endian encoding of the selector for functions
    /// without parameters, dropping leading zero bytes. A zero selector yields
    /// empty call data. Some older tooling produced call data this way.
    Minimal,
}

/// Computes the 4-byte function selector, the first 4 bytes of the
/// Keccak-256 hash of the signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Parses the parameter types of a function signature.
///
/// The parameter list is everything between the first `(` and the first `)`,
/// split on `,`, with each type trimmed. Only `()` denotes no parameters;
/// whitespace between the parentheses is an empty type and is rejected.
pub fn parse_signature(signature: &str) -> Result<Vec<ParamType>, Error> {
    let malformed = || Error::MalformedSignature(signature.to_owned());
    let open = signature.find('(').ok_or_else(malformed)?;
    let close = signature.find(')').ok_or_else(malformed)?;
    if close < open {
        return Err(malformed());
    }

    let params = &signature[open + 1..close];
    if params.is_empty() {
        return Ok(Vec::new());
    }
    params.split(',').map(|kind| kind.trim().parse()).collect()
}

/// Encodes call data for a contract function: the selector followed by the
/// ABI encoded arguments.
pub fn encode_function_call(signature: &str, tokens: &[Token]) -> Result<Vec<u8>, Error> {
    encode_function_call_with(signature, tokens, SelectorEncoding::default())
}

/// Encodes call data for a contract function with the specified selector
/// encoding.
pub fn encode_function_call_with(
    signature: &str,
    tokens: &[Token],
    encoding: SelectorEncoding,
) -> Result<Vec<u8>, Error> {
    let types = parse_signature(signature)?;
    let selector = selector(signature);

    if types.is_empty() {
        if !tokens.is_empty() {
            return Err(Error::ArityMismatch {
                expected: 0,
                actual: tokens.len(),
            });
        }
        return Ok(match encoding {
            SelectorEncoding::Padded => selector.to_vec(),
            SelectorEncoding::Minimal => minimal(selector),
        });
    }

    let mut data = selector.to_vec();
    data.extend(encode(&types, tokens)?);
    Ok(data)
}

/// Big-endian encoding of the selector without leading zero bytes.
fn minimal(selector: [u8; 4]) -> Vec<u8> {
    let start = selector.iter().position(|b| *b != 0).unwrap_or(4);
    selector[start..].to_vec()
}

/// Encodes call data from human-readable argument strings.
///
/// See [`super::tokenize`] for the accepted value formats.
pub fn encode_function_call_str(signature: &str, values: &[&str]) -> Result<Vec<u8>, Error> {
    let types = parse_signature(signature)?;
    if types.len() != values.len() {
        return Err(Error::ArityMismatch {
            expected: types.len(),
            actual: values.len(),
        });
    }
    let tokens = types
        .iter()
        .zip(values)
        .map(|(kind, value)| tokenize(kind, value))
        .collect::<Result<Vec<_>, _>>()?;
    encode_function_call(signature, &tokens)
}
