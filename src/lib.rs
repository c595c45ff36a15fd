//! PASETO `v4.local` tokens bound to a named key set.
//!
//! ```
//! use std::time::Duration;
//! use paseto_local::{ClaimSet, ClaimsConfig, KeyRing, LocalKey, TokenIssuer};
//!
//! // a set of named keys; the last key added is the encryption default
//! let mut keys = KeyRing::default();
//! keys.add_key("2026-01", LocalKey::random()?)?;
//! keys.add_key("2026-02", LocalKey::random()?)?;
//!
//! // expected claims and lifetime, fixed before the issuer is shared
//! let config = ClaimsConfig::new()
//!     .with_lifetime(Duration::from_secs(300))
//!     .from_issuer("https://issuer.example")
//!     .for_audience("https://api.example");
//! let issuer = TokenIssuer::new(keys, config);
//!
//! // mint a token; the key identifier rides in the footer
//! let mut claims = ClaimSet::new();
//! claims.insert("scope".to_owned(), "read".into());
//! let token = issuer.encode(claims, None, b"")?;
//!
//! // decrypt, then validate expiry and the configured claims
//! let claims = issuer.decode(&token, b"")?;
//! assert_eq!(claims["scope"], "read");
//! assert_eq!(claims["iss"], "https://issuer.example");
//! # Ok::<(), paseto_local::PasetoError>(())
//! ```

#![forbid(unsafe_code)]

pub mod claims;
/// Low level implementation primitives.
pub mod core;
pub mod keyring;
pub mod pae;
pub mod tokens;

pub use crate::claims::{ClaimSet, ClaimsConfig, TokenIssuer};
pub use crate::core::LocalKey;
pub use crate::keyring::KeyRing;
pub use crate::tokens::EncryptedToken;

#[derive(Debug)]
#[non_exhaustive]
/// Error returned for all v4.local token operations that can fail
pub enum PasetoError {
    /// The secret key was not exactly 32 bytes.
    InvalidKey,
    /// A key with this identifier is already present in the ring.
    DuplicateKeyId(String),
    /// The ring holds no keys.
    NoKeysConfigured,
    /// No key with this identifier is present in the ring.
    UnknownKeyId(String),
    /// The token does not start with the `v4.local.` header.
    UnsupportedVersion,
    /// The token was not of a valid form.
    InvalidToken,
    /// The token was not Base64 URL encoded correctly.
    Base64DecodeError,
    /// The authentication tag did not match.
    Tampered,
    /// The token footer did not match the asserted footer.
    FooterMismatch,
    /// The token is expired or not yet valid.
    Expired,
    /// A configured claim was missing or did not match, named here.
    ClaimMismatch(&'static str),
    /// There was an error with payload processing.
    PayloadError(serde_json::Error),
    /// Secure random generation was unavailable.
    Entropy,
}

impl std::error::Error for PasetoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PasetoError::PayloadError(x) => Some(x),
            _ => None,
        }
    }
}

impl std::fmt::Display for PasetoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasetoError::InvalidKey => f.write_str("Secret key must be 32 bytes (256 bits)"),
            PasetoError::DuplicateKeyId(id) => write!(f, "Key ID {id} is already defined"),
            PasetoError::NoKeysConfigured => f.write_str("No keys have been configured"),
            PasetoError::UnknownKeyId(id) => write!(f, "Key ID {id} is not defined"),
            PasetoError::UnsupportedVersion => f.write_str("Incorrect protocol version"),
            PasetoError::InvalidToken => f.write_str("Could not parse the token"),
            PasetoError::Base64DecodeError => {
                f.write_str("The token could not be base64 decoded")
            }
            PasetoError::Tampered => f.write_str("Token has been tampered with"),
            PasetoError::FooterMismatch => f.write_str("Footer assertion failed"),
            PasetoError::Expired => f.write_str("This token has expired"),
            PasetoError::ClaimMismatch(name) => {
                write!(f, "Expected claim {name:?} is missing or does not match")
            }
            PasetoError::PayloadError(x) => {
                write!(f, "there was an error with the payload encoding: {x}")
            }
            PasetoError::Entropy => f.write_str("Secure random generation failed"),
        }
    }
}
