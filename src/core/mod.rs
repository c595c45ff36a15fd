mod local;

use blake2::Blake2bMac;
use digest::Mac;
use generic_array::typenum::{U32, U56};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::PasetoError;

/// Header for v4.local tokens.
pub(crate) const HEADER: &str = "v4.local.";

/// A symmetric key used to encrypt and decrypt tokens.
///
/// Exactly 32 bytes. The key bytes are wiped when the value is dropped and
/// are never exposed through `Debug` or `Display`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LocalKey([u8; 32]);

/// Keys derived from a [`LocalKey`] for a single encrypt or decrypt call.
///
/// Wiped on drop, so every exit path of the caller releases the material.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct DerivedKeys {
    pub(crate) ek: [u8; 32],
    pub(crate) n2: [u8; 24],
    pub(crate) ak: [u8; 32],
}

impl LocalKey {
    /// Construct a key from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PasetoError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| PasetoError::InvalidKey)
    }

    /// Generate a random local key.
    pub fn random() -> Result<Self, PasetoError> {
        let mut bytes = [0; 32];
        getrandom::fill(&mut bytes).map_err(|_| PasetoError::Entropy)?;
        Ok(Self(bytes))
    }

    /// Derive the per-call encryption key, nonce tail and authentication key.
    ///
    /// The two domain strings keep the encryption and authentication keys
    /// separated even though they share a root secret and nonce.
    pub(crate) fn split_keys(&self, nonce: &[u8; 32]) -> DerivedKeys {
        let mut prf =
            Blake2bMac::<U56>::new_from_slice(&self.0).expect("32 byte key should be valid");
        prf.update(b"paseto-encryption-key");
        prf.update(nonce);
        let mut tmp = prf.finalize().into_bytes();

        let mut prf =
            Blake2bMac::<U32>::new_from_slice(&self.0).expect("32 byte key should be valid");
        prf.update(b"paseto-auth-key-for-aead");
        prf.update(nonce);
        let mut ak = prf.finalize().into_bytes();

        let mut keys = DerivedKeys {
            ek: [0; 32],
            n2: [0; 24],
            ak: [0; 32],
        };
        keys.ek.copy_from_slice(&tmp[..32]);
        keys.n2.copy_from_slice(&tmp[32..]);
        keys.ak.copy_from_slice(&ak);
        tmp.as_mut_slice().zeroize();
        ak.as_mut_slice().zeroize();
        keys
    }
}
