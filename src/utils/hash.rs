use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use tokio::fs;

/// Digest algorithm a [`ContentHash`] was computed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Length of the hex encoding of a digest
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

/// A fixed-length digest of an artifact's serialized content.
///
/// Hashes compare equal only when both the algorithm and the digest match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    algorithm: DigestAlgorithm,
    hex: String,
}

impl ContentHash {
    /// Wrap a hex digest produced elsewhere (e.g. a checksum exposed by the server).
    ///
    /// Returns `None` when the string is not a hex digest of the expected length.
    pub fn from_hex(algorithm: DigestAlgorithm, hex: &str) -> Option<Self> {
        let hex = hex.trim().to_ascii_lowercase();
        if hex.len() != algorithm.hex_len() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self { algorithm, hex })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Compute the digest of a byte slice
pub fn compute_hash(algorithm: DigestAlgorithm, content: &[u8]) -> ContentHash {
    let hex = match algorithm {
        DigestAlgorithm::Md5 => {
            let mut hasher = Md5::new();
            hasher.update(content);
            hex::encode(hasher.finalize())
        }
        DigestAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(content);
            hex::encode(hasher.finalize())
        }
    };
    ContentHash { algorithm, hex }
}

/// Compute the digest of a file's raw bytes
pub async fn compute_file_hash(
    algorithm: DigestAlgorithm,
    path: &Path,
) -> Result<ContentHash, std::io::Error> {
    let content = fs::read(path).await?;
    Ok(compute_hash(algorithm, &content))
}

/// Compact serialization of a JSON document with keys in sorted order.
///
/// `serde_json::Map` is a `BTreeMap` unless `preserve_order` is enabled,
/// so re-serializing a parsed value normalizes key order and whitespace.
pub fn canonical_json(value: &serde_json::Value) -> String {
    value.to_string()
}

/// SHA-256 of the canonical form of a JSON document
pub fn compute_json_hash(value: &serde_json::Value) -> ContentHash {
    compute_hash(DigestAlgorithm::Sha256, canonical_json(value).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compute_sha256() {
        let hash = compute_hash(DigestAlgorithm::Sha256, b"hello world");
        assert_eq!(
            hash.as_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_md5() {
        let hash = compute_hash(DigestAlgorithm::Md5, b"hello world");
        assert_eq!(hash.as_hex(), "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(hash.algorithm(), DigestAlgorithm::Md5);
    }

    #[test]
    fn test_from_hex_normalizes_case() {
        let hash = ContentHash::from_hex(DigestAlgorithm::Md5, "5EB63BBBE01EEED093CB22BB8F5ACDC3")
            .expect("valid digest");
        assert_eq!(hash, compute_hash(DigestAlgorithm::Md5, b"hello world"));
    }

    #[test]
    fn test_from_hex_rejects_wrong_length_or_garbage() {
        assert!(ContentHash::from_hex(DigestAlgorithm::Md5, "abc").is_none());
        assert!(ContentHash::from_hex(DigestAlgorithm::Md5, &"z".repeat(32)).is_none());
        assert!(ContentHash::from_hex(DigestAlgorithm::Sha256, &"a".repeat(32)).is_none());
    }

    #[test]
    fn test_same_digest_different_algorithm_is_not_equal() {
        let hex = "a".repeat(32);
        let md5 = ContentHash::from_hex(DigestAlgorithm::Md5, &hex).unwrap();
        let other = ContentHash {
            algorithm: DigestAlgorithm::Sha256,
            hex,
        };
        assert_ne!(md5, other);
    }

    #[test]
    fn test_json_hash_ignores_key_order_and_whitespace() {
        let a: serde_json::Value =
            serde_json::from_str("{\n  \"id\": \"db\",\n  \"port\": 5432\n}").unwrap();
        let b = json!({"port": 5432, "id": "db"});
        assert_eq!(compute_json_hash(&a), compute_json_hash(&b));
        assert_eq!(canonical_json(&b), r#"{"id":"db","port":5432}"#);
    }

    #[test]
    fn test_json_hash_detects_value_change() {
        let a = json!({"id": "db", "port": 5432});
        let b = json!({"id": "db", "port": 5433});
        assert_ne!(compute_json_hash(&a), compute_json_hash(&b));
    }

    #[tokio::test]
    async fn test_compute_file_hash_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.rb");
        fs::write(&path, "hello world").await.unwrap();
        let hash = compute_file_hash(DigestAlgorithm::Md5, &path).await.unwrap();
        assert_eq!(hash.as_hex(), "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }
}
