//! Content fingerprints for checkpoint metadata
//!
//! A [`Fingerprint`] is a 32-bit rolling hash over the UTF-16 code units of a
//! buffer (`h = h * 31 + unit`, wrapping). It is cheap to compute and stable
//! across platforms, which makes it useful for labelling checkpoints in lists
//! and logs. It is not collision resistant and nothing in the engine relies on
//! it for identity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A 32-bit content fingerprint
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default)]
pub struct Fingerprint(u32);

/// Error returned when parsing a fingerprint from text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseFingerprintError {
    #[error("invalid fingerprint length: expected 8 characters, got {0}")]
    Length(usize),
    #[error("invalid hex character: {0:?}")]
    Char(char),
}

impl Fingerprint {
    /// Wrap a raw value
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    /// Raw value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Convert to an 8 digit lowercase hex string
    pub fn to_hex(&self) -> String {
        const HEX_CHARS: &[u8] = b"0123456789abcdef";
        let mut hex = String::with_capacity(8);
        for byte in self.0.to_be_bytes() {
            hex.push(HEX_CHARS[(byte >> 4) as usize] as char);
            hex.push(HEX_CHARS[(byte & 0xf) as usize] as char);
        }
        hex
    }

    /// Parse from an 8 digit hex string
    pub fn from_hex(hex: &str) -> Result<Self, ParseFingerprintError> {
        if hex.len() != 8 {
            return Err(ParseFingerprintError::Length(hex.len()));
        }

        let mut value = 0u32;
        for c in hex.bytes() {
            value = (value << 4) | u32::from(hex_char_to_nibble(c)?);
        }
        Ok(Self(value))
    }
}

fn hex_char_to_nibble(c: u8) -> Result<u8, ParseFingerprintError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(ParseFingerprintError::Char(c as char)),
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Fingerprint a whole buffer
pub fn fingerprint(content: &str) -> Fingerprint {
    let mut hasher = IncrementalHasher::new();
    hasher.update(content);
    hasher.finalize()
}

/// Incremental hasher for fingerprinting content that arrives in pieces
#[derive(Debug, Clone, Default)]
pub struct IncrementalHasher {
    state: u32,
}

impl IncrementalHasher {
    /// Create a new incremental hasher
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more text
    pub fn update(&mut self, text: &str) {
        for unit in text.encode_utf16() {
            self.state = self.state.wrapping_mul(31).wrapping_add(u32::from(unit));
        }
    }

    /// Finalize and return the fingerprint
    pub fn finalize(self) -> Fingerprint {
        Fingerprint(self.state)
    }
}
