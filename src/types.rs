//! Shared types

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase hex SHA-256 digest string (64 characters)
pub type HexDigest = String;

/// Length of a hex-encoded SHA-256 digest
pub const HEX_DIGEST_LEN: usize = 64;

/// Returns true if `s` is exactly 64 lowercase hex characters.
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == HEX_DIGEST_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Root digest of an artifact's tree, as persisted per (name, version).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> HexDigest {
        self.0
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_hex_digest(&value) {
            Ok(Fingerprint(value))
        } else {
            Err(StorageError::InvalidFingerprint(value))
        }
    }
}

impl FromStr for Fingerprint {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fingerprint::try_from(s.to_string())
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
