//! Multi-key management.
//!
//! A [`KeyRing`] names each [`LocalKey`] with an identifier. Encryption
//! stamps the identifier into the token footer; decryption reads it back out
//! and selects the matching key, so callers never pass a key identifier when
//! decrypting.

use std::fmt;

use indexmap::IndexMap;

use crate::PasetoError;
use crate::core::LocalKey;
use crate::tokens::EncryptedToken;

/// A set of [`LocalKey`]s, selected by identifier.
#[derive(Clone, Default)]
pub struct KeyRing {
    keys: IndexMap<String, LocalKey>,
}

impl fmt::Debug for KeyRing {
    /// Lists the configured key identifiers without exposing any key material.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("key_ids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeyRing {
    /// Build a ring from `(identifier, key)` pairs.
    pub fn new(
        keys: impl IntoIterator<Item = (String, LocalKey)>,
    ) -> Result<Self, PasetoError> {
        let mut ring = Self::default();
        for (id, key) in keys {
            ring.add_key(id, key)?;
        }
        Ok(ring)
    }

    /// Add a key under a new identifier.
    ///
    /// Identifiers are permanent once added; re-adding one is an error
    /// rather than a rotation.
    pub fn add_key(
        &mut self,
        id: impl Into<String>,
        key: LocalKey,
    ) -> Result<&mut Self, PasetoError> {
        let id = id.into();
        if self.keys.contains_key(&id) {
            return Err(PasetoError::DuplicateKeyId(id));
        }
        self.keys.insert(id, key);
        Ok(self)
    }

    /// The configured identifiers, in insertion order.
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// The identifier used when the caller does not pick one: the last key
    /// added.
    pub fn default_key_id(&self) -> Option<&str> {
        self.keys.last().map(|(id, _)| id.as_str())
    }

    /// Encrypt `message` under the named key, with the identifier carried as
    /// the token footer.
    pub fn encrypt(
        &self,
        message: &[u8],
        key_id: &str,
        implicit: &[u8],
    ) -> Result<EncryptedToken, PasetoError> {
        if self.keys.is_empty() {
            return Err(PasetoError::NoKeysConfigured);
        }
        let key = self
            .keys
            .get(key_id)
            .ok_or_else(|| PasetoError::UnknownKeyId(key_id.to_owned()))?;
        key.encrypt(message, key_id.as_bytes(), implicit)
    }

    /// Decrypt a token, selecting the key named by its footer.
    pub fn decrypt(&self, token: &str, implicit: &[u8]) -> Result<Vec<u8>, PasetoError> {
        if self.keys.is_empty() {
            return Err(PasetoError::NoKeysConfigured);
        }

        let token: EncryptedToken = token.parse()?;
        let footer = token.unverified_footer();
        if footer.is_empty() {
            return Err(PasetoError::InvalidToken);
        }
        let key_id = String::from_utf8_lossy(footer);
        let key = self
            .keys
            .get(key_id.as_ref())
            .ok_or_else(|| PasetoError::UnknownKeyId(key_id.into_owned()))?;
        key.unseal(token, implicit)
    }
}
