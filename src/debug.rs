//! Hex formatting for byte payloads in `Debug` output.

use crate::serialization;
use std::fmt::{self, Debug, Display, Formatter};

pub struct Hex<'a>(pub &'a [u8]);

impl Debug for Hex<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Hex<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&serialization::encode_hex(self.0))
    }
}

/// Formats an optional payload, printing `None` when absent.
pub struct OptionHex<'a>(pub Option<&'a [u8]>);

impl Debug for OptionHex<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.0 {
            Some(bytes) => f.debug_tuple("Some").field(&Hex(bytes)).finish(),
            None => f.write_str("None"),
        }
    }
}
