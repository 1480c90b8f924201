//! Degree-sequence fingerprinting.
//!
//! A fingerprint must be stable across processes and platforms for the
//! same sequence given in the same (not sorted) order, so that the store
//! can group runs by degree-sequence class. We serialize the sequence as
//! compact JSON (no separators beyond comma/colon) and hash the UTF-8
//! bytes with SHA-256.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A stable 256-bit digest of a degree sequence, taken in the order it was
/// given (not sorted).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DegreeFingerprint([u8; 32]);

impl DegreeFingerprint {
    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Renders the digest as lowercase hex, the form used for storage and
    /// display.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

impl fmt::Debug for DegreeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DegreeFingerprint").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for DegreeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computes the fingerprint of a degree sequence, given in its original
/// (unsorted) position order.
pub fn degree_fingerprint(degrees: &[u32]) -> DegreeFingerprint {
    let serialized = serde_json::to_string(degrees).expect("Vec<u32> always serializes");
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    DegreeFingerprint(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_match() {
        let a = degree_fingerprint(&[3, 3, 3, 3]);
        let b = degree_fingerprint(&[3, 3, 3, 3]);
        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 64);
    }

    #[test]
    fn order_is_significant() {
        let a = degree_fingerprint(&[1, 2, 3]);
        let b = degree_fingerprint(&[3, 2, 1]);
        assert_ne!(a, b);
    }

    #[test]
    fn different_sequences_differ() {
        let a = degree_fingerprint(&[2, 2, 2, 2]);
        let b = degree_fingerprint(&[3, 3, 3, 3]);
        assert_ne!(a, b);
    }
}
