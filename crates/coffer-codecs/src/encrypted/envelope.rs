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

//! The on-disk layout of an encrypted file.
//!
//! Every file written by an encrypted codec starts with a fixed-size
//! [`EnvelopeHeader`] followed by the AES-GCM ciphertext and tag. The header
//! identifies the file, records the layout version, and carries the nonce.

use std::convert::TryInto;

/// A unique byte sequence to identify encrypted coffer files. ("CFRENC01").
pub const ENVELOPE_MAGIC_BYTES: [u8; 8] = *b"CFRENC01";
/// The envelope layout written by this version.
pub const ENVELOPE_VERSION: u8 = 1;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// The fixed-size header at the beginning of every encrypted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    /// Magic bytes to identify the file type, must be `ENVELOPE_MAGIC_BYTES`.
    pub magic_bytes: [u8; 8],
    /// The version of the envelope layout.
    pub format_version: u8,
    /// The nonce the payload was sealed with.
    pub nonce: [u8; NONCE_LEN],
}

// Fixed layout, parsed by hand rather than through serde.
impl EnvelopeHeader {
    /// The total size of the header in bytes.
    pub const SIZE: usize = 8 + 1 + NONCE_LEN;
    /// The prefix that is authenticated as associated data.
    pub const AAD_LEN: usize = 8 + 1;

    /// Creates a header for the current layout version.
    pub fn new(nonce: [u8; NONCE_LEN]) -> Self {
        Self {
            magic_bytes: ENVELOPE_MAGIC_BYTES,
            format_version: ENVELOPE_VERSION,
            nonce,
        }
    }

    /// Writes the header into its byte form.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(&self.magic_bytes);
        bytes[8] = self.format_version;
        bytes[Self::AAD_LEN..].copy_from_slice(&self.nonce);
        bytes
    }

    /// The associated data bound to the ciphertext.
    pub fn aad(&self) -> [u8; Self::AAD_LEN] {
        let mut aad = [0u8; Self::AAD_LEN];
        aad[0..8].copy_from_slice(&self.magic_bytes);
        aad[8] = self.format_version;
        aad
    }

    /// Attempts to parse an `EnvelopeHeader` from the beginning of a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() < Self::SIZE {
            return Err("Not enough bytes to form a valid envelope header");
        }

        let magic_bytes: [u8; 8] = bytes[0..8]
            .try_into()
            .map_err(|_| "Malformed magic bytes")?;
        if magic_bytes != ENVELOPE_MAGIC_BYTES {
            return Err("Invalid magic bytes; not an encrypted coffer file");
        }

        let format_version = bytes[8];
        if format_version != ENVELOPE_VERSION {
            return Err("Unsupported envelope version");
        }

        let nonce: [u8; NONCE_LEN] = bytes[Self::AAD_LEN..Self::SIZE]
            .try_into()
            .map_err(|_| "Malformed nonce")?;

        Ok(Self {
            magic_bytes,
            format_version,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes_parse_back() {
        let header = EnvelopeHeader::new([7u8; NONCE_LEN]);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..8], b"CFRENC01");
        assert_eq!(EnvelopeHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(EnvelopeHeader::from_bytes(b"CFRENC01").is_err());
    }

    #[test]
    fn foreign_magic_is_rejected() {
        let mut bytes = EnvelopeHeader::new([0u8; NONCE_LEN]).to_bytes();
        bytes[0] = b'X';
        assert_eq!(
            EnvelopeHeader::from_bytes(&bytes),
            Err("Invalid magic bytes; not an encrypted coffer file")
        );
    }

    #[test]
    fn future_version_is_rejected() {
        let mut bytes = EnvelopeHeader::new([0u8; NONCE_LEN]).to_bytes();
        bytes[8] = ENVELOPE_VERSION + 1;
        assert!(EnvelopeHeader::from_bytes(&bytes).is_err());
    }
}
