// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The encryption decorator.
//!
//! [`EncryptedCodec`] holds a plain codec and an AES-256-GCM cipher. Encoding
//! runs the inner codec into memory, seals the bytes and writes an envelope;
//! decoding reverses the steps before handing the plaintext to the inner codec.
//!
//! The cipher key is derived once, at construction, with HKDF-SHA256 using the
//! configured salt as HKDF salt and the configured key as input key material.

mod envelope;

pub use envelope::{EnvelopeHeader, ENVELOPE_MAGIC_BYTES, ENVELOPE_VERSION, NONCE_LEN};

use crate::read_all;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use coffer_core::{Codec, MethodKind, PersistResult, PersistenceError, TypeDescriptor};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use std::any::Any;
use std::fmt;
use std::io::{Read, Write};

const KEY_DERIVATION_INFO: &[u8] = b"coffer-codec-key-v1";

/// A codec that encrypts the byte stream of another codec.
pub struct EncryptedCodec {
    kind: MethodKind,
    inner: Box<dyn Codec>,
    cipher: Aes256Gcm,
}

impl EncryptedCodec {
    /// Wraps `inner`, reporting itself as `kind`.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Configuration`] if `key` or `salt` is empty.
    /// This is checked here, not on first use, so a bad configuration fails as
    /// soon as the method is resolved.
    pub fn new(
        kind: MethodKind,
        inner: Box<dyn Codec>,
        key: &str,
        salt: &str,
    ) -> PersistResult<Self> {
        if key.is_empty() {
            return Err(PersistenceError::Configuration {
                kind,
                reason: "encryption key is empty".to_string(),
            });
        }
        if salt.is_empty() {
            return Err(PersistenceError::Configuration {
                kind,
                reason: "encryption salt is empty".to_string(),
            });
        }

        let hk = Hkdf::<Sha256>::new(Some(salt.as_bytes()), key.as_bytes());
        let mut derived = [0u8; 32];
        hk.expand(KEY_DERIVATION_INFO, &mut derived)
            .map_err(|e| PersistenceError::Configuration {
                kind,
                reason: e.to_string(),
            })?;
        let cipher =
            Aes256Gcm::new_from_slice(&derived).map_err(|e| PersistenceError::Configuration {
                kind,
                reason: e.to_string(),
            })?;

        log::debug!(
            "Derived {kind} cipher key wrapping {} codec.",
            inner.kind()
        );

        Ok(Self {
            kind,
            inner,
            cipher,
        })
    }

    /// The method of the wrapped codec.
    pub fn inner_kind(&self) -> MethodKind {
        self.inner.kind()
    }

    fn seal(&self, plaintext: &[u8]) -> PersistResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let header = EnvelopeHeader::new(nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: plaintext,
                    aad: &header.aad(),
                },
            )
            .map_err(|e| PersistenceError::encode(self.kind, e))?;

        let mut sealed = Vec::with_capacity(EnvelopeHeader::SIZE + ciphertext.len());
        sealed.extend_from_slice(&header.to_bytes());
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn open(&self, sealed: &[u8]) -> PersistResult<Vec<u8>> {
        let header =
            EnvelopeHeader::from_bytes(sealed).map_err(|e| PersistenceError::decode(self.kind, e))?;

        // A wrong key or salt, or a tampered file, fails authentication here.
        self.cipher
            .decrypt(
                Nonce::from_slice(&header.nonce),
                Payload {
                    msg: &sealed[EnvelopeHeader::SIZE..],
                    aad: &header.aad(),
                },
            )
            .map_err(|_| {
                PersistenceError::decode(
                    self.kind,
                    "authentication failed (wrong key or salt, or corrupted data)",
                )
            })
    }
}

impl Codec for EncryptedCodec {
    fn kind(&self) -> MethodKind {
        self.kind
    }

    fn encode(
        &self,
        value: &dyn erased_serde::Serialize,
        sink: &mut dyn Write,
    ) -> PersistResult<()> {
        let mut plaintext = Vec::new();
        self.inner.encode(value, &mut plaintext)?;
        let sealed = self.seal(&plaintext)?;
        sink.write_all(&sealed)?;
        sink.flush()?;
        Ok(())
    }

    fn decode(
        &self,
        descriptor: &TypeDescriptor,
        source: &mut dyn Read,
    ) -> PersistResult<Box<dyn Any + Send>> {
        let sealed = read_all(source)?;
        let plaintext = self.open(&sealed)?;
        self.inner.decode(descriptor, &mut plaintext.as_slice())
    }
}

impl fmt::Debug for EncryptedCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedCodec")
            .field("kind", &self.kind)
            .field("inner", &self.inner.kind())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryCodec, JsonCodec};
    use coffer_core::CodecExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Wallet {
        gold: u64,
        gems: Vec<u16>,
    }

    fn wallet() -> Wallet {
        Wallet {
            gold: 9001,
            gems: vec![1, 2, 3],
        }
    }

    fn json_encrypted(key: &str, salt: &str) -> PersistResult<EncryptedCodec> {
        EncryptedCodec::new(
            MethodKind::JsonEncrypted,
            Box::new(JsonCodec::new()),
            key,
            salt,
        )
    }

    #[test]
    fn empty_key_or_salt_fails_at_construction() {
        let err = json_encrypted("", "salt").unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Configuration {
                kind: MethodKind::JsonEncrypted,
                ..
            }
        ));
        assert!(matches!(
            json_encrypted("key", "").unwrap_err(),
            PersistenceError::Configuration { .. }
        ));
    }

    #[test]
    fn round_trip_for_both_families() {
        let json = json_encrypted("key", "salt").unwrap();
        let binary = EncryptedCodec::new(
            MethodKind::BinaryEncrypted,
            Box::new(BinaryCodec::new()),
            "key",
            "salt",
        )
        .unwrap();

        for codec in [&json as &dyn Codec, &binary as &dyn Codec] {
            let mut buffer = Vec::new();
            codec.encode_value(&wallet(), &mut buffer).unwrap();
            let decoded: Wallet = codec.decode_value(&mut buffer.as_slice()).unwrap();
            assert_eq!(decoded, wallet());
        }
    }

    #[test]
    fn ciphertext_hides_plaintext() {
        let codec = json_encrypted("key", "salt").unwrap();
        let mut buffer = Vec::new();
        codec.encode_value(&wallet(), &mut buffer).unwrap();

        assert!(buffer.starts_with(&ENVELOPE_MAGIC_BYTES));
        let haystack = String::from_utf8_lossy(&buffer);
        assert!(!haystack.contains("gold"));
    }

    #[test]
    fn each_encode_uses_a_fresh_nonce() {
        let codec = json_encrypted("key", "salt").unwrap();
        let mut first = Vec::new();
        let mut second = Vec::new();
        codec.encode_value(&wallet(), &mut first).unwrap();
        codec.encode_value(&wallet(), &mut second).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn wrong_key_or_salt_does_not_decode() {
        let writer = json_encrypted("k1", "s1").unwrap();
        let mut buffer = Vec::new();
        writer.encode_value(&wallet(), &mut buffer).unwrap();

        for (key, salt) in [("k2", "s1"), ("k1", "s2"), ("k2", "s2")] {
            let reader = json_encrypted(key, salt).unwrap();
            let err = reader
                .decode_value::<Wallet>(&mut buffer.as_slice())
                .unwrap_err();
            assert!(matches!(err, PersistenceError::Decode { .. }));
        }
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let codec = json_encrypted("key", "salt").unwrap();
        let mut buffer = Vec::new();
        codec.encode_value(&wallet(), &mut buffer).unwrap();
        let last = buffer.len() - 1;
        buffer[last] ^= 0x01;

        assert!(codec.decode_value::<Wallet>(&mut buffer.as_slice()).is_err());
    }

    #[test]
    fn plain_file_is_not_accepted() {
        let codec = json_encrypted("key", "salt").unwrap();
        let plain = serde_json::to_vec(&wallet()).unwrap();
        assert!(codec.decode_value::<Wallet>(&mut plain.as_slice()).is_err());
    }

    #[test]
    fn debug_does_not_print_cipher_state() {
        let codec = json_encrypted("key", "salt").unwrap();
        let printed = format!("{codec:?}");
        assert!(printed.contains("JsonEncrypted"));
        assert!(!printed.contains("key"));
    }
}
