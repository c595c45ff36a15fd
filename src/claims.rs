//! JSON claim sets atop the key ring.
//!
//! A [`TokenIssuer`] mints tokens whose payload is a JSON object of claims,
//! stamping temporal claims (`iat`, `nbf`, `exp`) from a configured lifetime
//! and overlaying configured literal claims (`aud`, `jti`, `iss`, `sub`) on
//! whatever the caller supplies. Decoding reverses the trip and validates
//! both, unless explicitly skipped.

use std::time::Duration;

use jiff::Timestamp;
use serde_json::Value;
use subtle::ConstantTimeEq;

use crate::PasetoError;
use crate::keyring::KeyRing;

/// An ordered set of token claims.
pub type ClaimSet = serde_json::Map<String, Value>;

/// Expected claims and token lifetime.
///
/// Immutable once built; construct the full configuration before handing it
/// to [`TokenIssuer::new`]. Configured claims always win over caller-supplied
/// claims of the same name on encode, and are required to match on decode.
#[derive(Clone, Debug, Default)]
pub struct ClaimsConfig {
    audience: Option<String>,
    issuer: Option<String>,
    subject: Option<String>,
    token_id: Option<String>,
    lifetime: Option<Duration>,
}

impl ClaimsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `iat`/`nbf` and an `exp` this far in the future on encode, and
    /// enforce both bounds on decode.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn for_audience(mut self, aud: impl Into<String>) -> Self {
        self.audience = Some(aud.into());
        self
    }

    pub fn from_issuer(mut self, iss: impl Into<String>) -> Self {
        self.issuer = Some(iss.into());
        self
    }

    pub fn for_subject(mut self, sub: impl Into<String>) -> Self {
        self.subject = Some(sub.into());
        self
    }

    pub fn with_token_id(mut self, jti: impl Into<String>) -> Self {
        self.token_id = Some(jti.into());
        self
    }

    fn expected(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("aud", &self.audience),
            ("jti", &self.token_id),
            ("iss", &self.issuer),
            ("sub", &self.subject),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }
}

/// Issues and validates claim-bearing tokens across a [`KeyRing`].
pub struct TokenIssuer {
    keys: KeyRing,
    config: ClaimsConfig,
}

impl TokenIssuer {
    pub fn new(keys: KeyRing, config: ClaimsConfig) -> Self {
        Self { keys, config }
    }

    /// Serialize `claims` and encrypt them under `key_id`, or under the
    /// ring's default key when none is given.
    ///
    /// With a lifetime configured, `nbf`, `iat` and `exp` are filled in for
    /// the caller but never overwritten, so a caller-supplied `exp` stands.
    pub fn encode(
        &self,
        mut claims: ClaimSet,
        key_id: Option<&str>,
        implicit: &[u8],
    ) -> Result<String, PasetoError> {
        if let Some(lifetime) = self.config.lifetime {
            let now = Timestamp::now();
            fill_claim(&mut claims, "nbf", now);
            fill_claim(&mut claims, "iat", now);
            fill_claim(&mut claims, "exp", now + lifetime);
        }
        for (name, value) in self.config.expected() {
            claims.insert(name.to_owned(), Value::String(value.to_owned()));
        }

        let key_id = key_id
            .or_else(|| self.keys.default_key_id())
            .ok_or(PasetoError::NoKeysConfigured)?;
        let message = serde_json::to_vec(&claims).map_err(PasetoError::PayloadError)?;
        Ok(self.keys.encrypt(&message, key_id, implicit)?.to_string())
    }

    /// Decrypt a token and validate its claims.
    pub fn decode(&self, token: &str, implicit: &[u8]) -> Result<ClaimSet, PasetoError> {
        let claims = self.dangerous_decode_unvalidated(token, implicit)?;
        self.validate(&claims)?;
        Ok(claims)
    }

    /// Decrypt a token without any claim validation.
    ///
    /// The returned claims are authenticated but may be expired or carry
    /// values the configuration would reject. Useful for inspecting a stale
    /// token; never a substitute for [`decode`](Self::decode).
    pub fn dangerous_decode_unvalidated(
        &self,
        token: &str,
        implicit: &[u8],
    ) -> Result<ClaimSet, PasetoError> {
        let message = self.keys.decrypt(token, implicit)?;
        serde_json::from_slice(&message).map_err(PasetoError::PayloadError)
    }

    /// Check temporal claims against the configured lifetime and literal
    /// claims against the configured expectations.
    pub fn validate(&self, claims: &ClaimSet) -> Result<(), PasetoError> {
        if self.config.lifetime.is_some() {
            let now = Timestamp::now();
            if let Some(exp) = temporal_claim(claims, "exp")? {
                if now > exp {
                    return Err(PasetoError::Expired);
                }
            }
            if let Some(nbf) = temporal_claim(claims, "nbf")? {
                if now < nbf {
                    return Err(PasetoError::Expired);
                }
            }
        }

        for (name, expected) in self.config.expected() {
            let value = claims
                .get(name)
                .and_then(Value::as_str)
                .ok_or(PasetoError::ClaimMismatch(name))?;
            if !bool::from(value.as_bytes().ct_eq(expected.as_bytes())) {
                return Err(PasetoError::ClaimMismatch(name));
            }
        }

        Ok(())
    }
}

fn fill_claim(claims: &mut ClaimSet, name: &str, value: Timestamp) {
    if claims.get(name).map_or(true, Value::is_null) {
        claims.insert(name.to_owned(), Value::String(value.to_string()));
    }
}

fn temporal_claim(claims: &ClaimSet, name: &'static str) -> Result<Option<Timestamp>, PasetoError> {
    let Some(value) = claims.get(name) else {
        return Ok(None);
    };
    let ts = value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or(PasetoError::ClaimMismatch(name))?;
    Ok(Some(ts))
}
