//! Structural fingerprints
//!
//! Provides [`ContentHash`], a Blake3 digest over the canonical JSON form of a
//! graph or menu node. Two values with equal fingerprints are structurally
//! identical, which is how build output is checked against its source.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte Blake3 digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Wrap raw digest bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash arbitrary bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self::new(*blake3::hash(data).as_bytes())
    }

    /// Hash the canonical JSON encoding of a value
    ///
    /// Only deterministic encodings are hashed: every model type keeps its
    /// collections in `Vec` or `IndexMap`, never in hash-ordered maps.
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn compute_serializable<T>(value: &T) -> Result<Self, HashError>
    where
        T: serde::Serialize + ?Sized,
    {
        let json = serde_json::to_vec(value)?;
        Ok(Self::compute(&json))
    }

    /// First 16 hex characters, for log lines
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for ContentHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl serde::Serialize for ContentHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ContentHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Anything whose structure can be fingerprinted
pub trait Fingerprint: serde::Serialize {
    /// Compute the structural fingerprint
    ///
    /// # Errors
    /// Returns error if the value cannot be serialized
    fn fingerprint(&self) -> Result<ContentHash, HashError> {
        ContentHash::compute_serializable(self)
    }
}

/// Errors that can occur when working with fingerprints
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Invalid digest length
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
