use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

/// Longest key accepted by [`StorageKey::parse`].
const MAX_KEY_LEN: usize = 128;

/// A validated, flat object name in the blob store.
///
/// Keys contain only ASCII letters, digits, `.`, `_` and `-`, never start
/// with a dot, and never contain a path separator, so they are safe to use
/// both as S3 object names and as file names under a single directory.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Generate a fresh `<uuid>.<extension>` key.
    pub fn generate(extension: &str) -> Result<Self, StorageError> {
        Self::parse(&format!("{}.{}", Uuid::now_v7(), extension))
    }

    /// Validate an existing key string.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.is_empty() || s.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey(format!(
                "expected 1-{MAX_KEY_LEN} characters, got {}",
                s.len()
            )));
        }
        if s.starts_with('.') {
            return Err(StorageError::InvalidKey("must not start with '.'".into()));
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(StorageError::InvalidKey(format!(
                "unexpected character {c:?}"
            )));
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey({})", self.0)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StorageKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StorageKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
