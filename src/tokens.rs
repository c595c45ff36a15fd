//! Token wire format.
//!
//! `v4.local.` followed by the base64url payload (nonce, ciphertext, tag)
//! and, when present, a dot and the base64url footer.

use std::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::PasetoError;
use crate::core::HEADER;

/// A parsed but not yet decrypted token.
#[derive(Debug)]
pub struct EncryptedToken {
    pub(crate) payload: Vec<u8>,
    pub(crate) footer: Vec<u8>,
}

impl EncryptedToken {
    /// View the **unverified** footer for this token.
    ///
    /// The footer is only authenticated once decryption succeeds.
    pub fn unverified_footer(&self) -> &[u8] {
        &self.footer
    }
}

impl fmt::Display for EncryptedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(HEADER)?;
        f.write_str(&Base64UrlUnpadded::encode_string(&self.payload))?;

        if !self.footer.is_empty() {
            f.write_str(".")?;
            f.write_str(&Base64UrlUnpadded::encode_string(&self.footer))?;
        }

        Ok(())
    }
}

impl std::str::FromStr for EncryptedToken {
    type Err = PasetoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s
            .strip_prefix(HEADER)
            .ok_or(PasetoError::UnsupportedVersion)?;

        let (payload, footer) = match s.split_once('.') {
            Some((_, footer)) if footer.contains('.') => return Err(PasetoError::InvalidToken),
            Some((payload, footer)) => (payload, Some(footer)),
            None => (s, None),
        };

        let payload = Base64UrlUnpadded::decode_vec(payload)
            .map_err(|_| PasetoError::Base64DecodeError)?;
        // nonce and tag alone are 64 bytes; the ciphertext may be empty
        if payload.len() < 64 {
            return Err(PasetoError::InvalidToken);
        }

        let footer = footer
            .map(Base64UrlUnpadded::decode_vec)
            .transpose()
            .map_err(|_| PasetoError::Base64DecodeError)?
            .unwrap_or_default();

        Ok(Self { payload, footer })
    }
}
