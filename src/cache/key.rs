//! Cache keys for compiled artifacts
//!
//! A key is derived from the resolved source path only, never from file
//! contents or timestamps. Same path = same artifact.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// Number of digest bytes kept in a key (32 hex chars)
const KEY_BYTES: usize = 16;

/// Fixed-length digest naming one artifact in the cache root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Length of the hex form of every key
    pub const LEN: usize = KEY_BYTES * 2;

    /// Derive the key for a resolved source path
    pub fn for_path(path: &Path) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(path.as_os_str().as_encoded_bytes());
        let result = hasher.finalize();

        Self(hex::encode(&result[..KEY_BYTES]))
    }

    /// Parse a file name back into a key, if it looks like one
    pub fn from_file_name(name: &str) -> Option<Self> {
        let valid = name.len() == Self::LEN
            && name
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));

        valid.then(|| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
