use blake2::Blake2bMac;
use chacha20::{Key, XChaCha20, XNonce};
use cipher::StreamCipher;
use digest::Mac;
use generic_array::typenum::U32;
use subtle::ConstantTimeEq;

use crate::PasetoError;
use crate::pae::{WriteBytes, pre_auth_encode};
use crate::tokens::EncryptedToken;

use super::{DerivedKeys, HEADER, LocalKey};

impl DerivedKeys {
    fn cipher(&self) -> XChaCha20 {
        use cipher::KeyIvInit;
        XChaCha20::new(Key::from_slice(&self.ek), XNonce::from_slice(&self.n2))
    }

    fn mac(&self) -> Blake2bMac<U32> {
        Blake2bMac::new_from_slice(&self.ak).expect("32 byte key should be valid")
    }
}

impl LocalKey {
    /// Encrypt `message` under a fresh random nonce.
    ///
    /// The footer is authenticated but not encrypted. The implicit assertion
    /// is authenticated but never transmitted; decryption must present the
    /// same bytes.
    pub fn encrypt(
        &self,
        message: &[u8],
        footer: &[u8],
        implicit: &[u8],
    ) -> Result<EncryptedToken, PasetoError> {
        let mut nonce = [0; 32];
        getrandom::fill(&mut nonce).map_err(|_| PasetoError::Entropy)?;
        Ok(self.seal(nonce, message, footer, implicit))
    }

    /// Encrypt with a caller-provided nonce.
    ///
    /// Reusing a nonce under the same key forfeits all confidentiality and
    /// authenticity. Only for reproducing known-answer vectors.
    pub fn dangerous_encrypt_with_nonce(
        &self,
        message: &[u8],
        footer: &[u8],
        implicit: &[u8],
        nonce: [u8; 32],
    ) -> EncryptedToken {
        self.seal(nonce, message, footer, implicit)
    }

    fn seal(
        &self,
        nonce: [u8; 32],
        message: &[u8],
        footer: &[u8],
        implicit: &[u8],
    ) -> EncryptedToken {
        let keys = self.split_keys(&nonce);

        let mut payload = Vec::with_capacity(64 + message.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(message);
        keys.cipher().apply_keystream(&mut payload[32..]);

        let mut mac = keys.mac();
        preauth_local(&mut mac, &nonce, &payload[32..], footer, implicit);
        payload.extend_from_slice(&mac.finalize().into_bytes());

        EncryptedToken {
            payload,
            footer: footer.to_vec(),
        }
    }

    /// Parse and decrypt a token from its wire form.
    ///
    /// When `expected_footer` is given, the token's footer must match it
    /// (compared in constant time) before any cryptography runs.
    pub fn decrypt(
        &self,
        token: &str,
        implicit: &[u8],
        expected_footer: Option<&[u8]>,
    ) -> Result<Vec<u8>, PasetoError> {
        let token: EncryptedToken = token.parse()?;
        if let Some(expected) = expected_footer {
            if !bool::from(token.unverified_footer().ct_eq(expected)) {
                return Err(PasetoError::FooterMismatch);
            }
        }
        self.unseal(token, implicit)
    }

    /// Decrypt an already-parsed token.
    ///
    /// The authentication tag is verified before the ciphertext is touched;
    /// a tampered token never yields plaintext.
    pub fn unseal(&self, token: EncryptedToken, implicit: &[u8]) -> Result<Vec<u8>, PasetoError> {
        let EncryptedToken { payload, footer } = token;

        let (front, tag) = payload
            .split_last_chunk::<32>()
            .ok_or(PasetoError::InvalidToken)?;
        let (nonce, ciphertext) = front
            .split_first_chunk::<32>()
            .ok_or(PasetoError::InvalidToken)?;

        let keys = self.split_keys(nonce);

        let mut mac = keys.mac();
        preauth_local(&mut mac, nonce, ciphertext, &footer, implicit);
        mac.verify(tag.into()).map_err(|_| PasetoError::Tampered)?;

        let mut plaintext = ciphertext.to_vec();
        keys.cipher().apply_keystream(&mut plaintext);
        Ok(plaintext)
    }
}

struct PreAuthEncodeDigest<'a, M: digest::Update>(&'a mut M);

impl<M: digest::Update> WriteBytes for PreAuthEncodeDigest<'_, M> {
    fn write(&mut self, slice: &[u8]) {
        self.0.update(slice)
    }
}

fn preauth_local(
    mac: &mut Blake2bMac<U32>,
    nonce: &[u8],
    ciphertext: &[u8],
    footer: &[u8],
    implicit: &[u8],
) {
    pre_auth_encode(
        [HEADER.as_bytes(), nonce, ciphertext, footer, implicit],
        PreAuthEncodeDigest(mac),
    )
}
