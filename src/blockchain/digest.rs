use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

/// Number of leading bytes that must be zero for a digest to count as mined.
pub const DIFFICULTY_BYTES: usize = 3;

/// Output size of the block hash function
pub const DIGEST_LEN: usize = 32;

/// Errors that can occur when building a digest value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("Malformed digest: {len} bytes supplied, at least {} required", DIFFICULTY_BYTES)]
    MalformedDigest { len: usize },

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// Immutable wrapper around the bytes produced by the block hash function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigestValue(Vec<u8>);

impl DigestValue {
    /// Wraps an existing digest.
    ///
    /// # Arguments
    ///
    /// * `data` - The raw digest bytes
    ///
    /// # Returns
    ///
    /// The digest value, or `MalformedDigest` if `data` is shorter than the
    /// difficulty window
    pub fn from_bytes(data: &[u8]) -> Result<Self, DigestError> {
        if data.len() < DIFFICULTY_BYTES {
            return Err(DigestError::MalformedDigest { len: data.len() });
        }

        Ok(DigestValue(data.to_vec()))
    }

    /// Hashes `preimage` with SHA-256
    pub fn compute(preimage: &[u8]) -> Self {
        DigestValue(Sha256::digest(preimage).to_vec())
    }

    /// Returns the raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks the proof-of-work target: the first `DIFFICULTY_BYTES` bytes are zero
    pub fn is_valid(&self) -> bool {
        self.0.len() >= DIFFICULTY_BYTES && self.0[..DIFFICULTY_BYTES].iter().all(|b| *b == 0)
    }

    /// Lowercase hex, two characters per byte
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Folds the digest into the 8-byte value mixed into a successor's preimage.
    ///
    /// This is the low 64 bits of the digest read as a big-endian integer,
    /// i.e. its last eight bytes. Shorter digests are zero-extended on the left.
    pub fn reference_reduction(&self) -> u64 {
        let mut low = [0u8; 8];
        let take = self.0.len().min(8);
        low[8 - take..].copy_from_slice(&self.0[self.0.len() - take..]);
        u64::from_be_bytes(low)
    }
}

impl AsRef<[u8]> for DigestValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for DigestValue {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| DigestError::DecodingError(e.to_string()))?;

        DigestValue::from_bytes(&bytes)
    }
}

impl Serialize for DigestValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undersized_input_is_rejected() {
        let err = DigestValue::from_bytes(&[0u8; 2]).unwrap_err();
        assert_eq!(err, DigestError::MalformedDigest { len: 2 });

        assert!(DigestValue::from_bytes(&[]).is_err());
        assert!(DigestValue::from_bytes(&[0u8; 3]).is_ok());
    }

    #[test]
    fn test_validity_requires_three_zero_bytes() {
        let mut bytes = [0xABu8; DIGEST_LEN];
        bytes[..3].copy_from_slice(&[0, 0, 0]);
        assert!(DigestValue::from_bytes(&bytes).unwrap().is_valid());

        bytes[2] = 0x01;
        assert!(!DigestValue::from_bytes(&bytes).unwrap().is_valid());

        bytes[2] = 0x00;
        bytes[0] = 0x80;
        assert!(!DigestValue::from_bytes(&bytes).unwrap().is_valid());
    }

    #[test]
    fn test_hex_rendering() {
        let digest = DigestValue::from_bytes(&[0x00, 0x0f, 0xa0, 0xff]).unwrap();
        assert_eq!(digest.to_hex(), "000fa0ff");
        assert_eq!(digest.to_string(), "000fa0ff");

        let full = DigestValue::compute(b"hello");
        assert_eq!(full.to_hex().len(), 64);
        assert_eq!(
            full.to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = DigestValue::from_bytes(&[1, 2, 3, 4]).unwrap();
        let b = DigestValue::from_bytes(&[1, 2, 3, 4]).unwrap();
        let c = DigestValue::from_bytes(&[1, 2, 3, 5]).unwrap();
        let shorter = DigestValue::from_bytes(&[1, 2, 3]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, shorter);
    }

    #[test]
    fn test_reference_reduction_uses_low_eight_bytes() {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes[0] = 0xFF;
        bytes[24..].copy_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        let digest = DigestValue::from_bytes(&bytes).unwrap();
        assert_eq!(digest.reference_reduction(), 0x0102_0304_0506_0708);

        let short = DigestValue::from_bytes(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(short.reference_reduction(), 0x0001_0203);
    }

    #[test]
    fn test_parse_from_hex() {
        let digest: DigestValue = "00000001ff".parse().unwrap();
        assert_eq!(digest.as_bytes(), &[0, 0, 0, 1, 0xff]);

        assert!(matches!(
            "zz".parse::<DigestValue>(),
            Err(DigestError::DecodingError(_))
        ));
        assert_eq!(
            "0000".parse::<DigestValue>(),
            Err(DigestError::MalformedDigest { len: 2 })
        );
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let digest = DigestValue::from_bytes(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(serde_json::to_string(&digest).unwrap(), "\"deadbeef\"");
    }
}
