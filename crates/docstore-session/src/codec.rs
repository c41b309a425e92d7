//! Authenticated encryption of cookie and session values.
//!
//! A value is serialized to JSON together with its issue time, sealed with
//! ChaCha20-Poly1305 using the cookie name as associated data, and rendered
//! as URL-safe base64 of `nonce || ciphertext`. Binding the name means a
//! value minted for one cookie does not open under another.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

const TAG_SIZE: usize = 16;

#[derive(Serialize, Deserialize)]
struct Sealed<T> {
    #[serde(rename = "t")]
    issued: i64,
    #[serde(rename = "v")]
    value: T,
}

/// Seals values under an ordered list of keys.
///
/// The first key encodes; every key is tried when decoding, so a new key can
/// be put in front while values sealed under the old one stay readable.
#[derive(Clone)]
pub struct SessionCodec {
    ciphers: Vec<ChaCha20Poly1305>,
    max_age: i64,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("keys", &self.ciphers.len())
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl SessionCodec {
    pub fn new<K, I>(keys: I) -> SessionResult<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let ciphers = keys
            .into_iter()
            .map(|key| {
                let key = key.as_ref();
                ChaCha20Poly1305::new_from_slice(key).map_err(|_| SessionError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: key.len(),
                })
            })
            .collect::<SessionResult<Vec<_>>>()?;

        if ciphers.is_empty() {
            return Err(SessionError::NoKeys);
        }
        Ok(Self { ciphers, max_age: 0 })
    }

    /// A fresh random key.
    pub fn generate_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut key);
        key
    }

    /// Reject values older than `seconds` when decoding. Zero or less
    /// disables the check.
    pub fn set_max_age(&mut self, seconds: i64) {
        self.max_age = seconds;
    }

    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    pub fn encode<T>(&self, name: &str, value: &T) -> SessionResult<String>
    where
        T: Serialize + ?Sized,
    {
        let plaintext = serde_json::to_vec(&Sealed {
            issued: unix_now(),
            value,
        })?;

        let mut nonce = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let ciphertext = self.ciphers[0]
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &plaintext,
                    aad: name.as_bytes(),
                },
            )
            .map_err(|_| SessionError::Encryption)?;

        let mut bytes = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        bytes.extend_from_slice(&nonce);
        bytes.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn decode<T>(&self, name: &str, encoded: &str) -> SessionResult<T>
    where
        T: DeserializeOwned,
    {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| SessionError::Decode(format!("invalid base64: {e}")))?;
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(SessionError::Decode("value too short".to_string()));
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);

        let plaintext = self
            .ciphers
            .iter()
            .find_map(|cipher| {
                cipher
                    .decrypt(
                        Nonce::from_slice(nonce),
                        Payload {
                            msg: ciphertext,
                            aad: name.as_bytes(),
                        },
                    )
                    .ok()
            })
            .ok_or_else(|| SessionError::Decode("no key opens the value".to_string()))?;

        let sealed: Sealed<T> = serde_json::from_slice(&plaintext)?;
        if self.max_age > 0 && unix_now() - sealed.issued > self.max_age {
            return Err(SessionError::Expired);
        }
        Ok(sealed.value)
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
