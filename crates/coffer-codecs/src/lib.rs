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

//! Concrete serialization codecs.
//!
//! Every codec here implements [`coffer_core::Codec`]. The plain families are
//! [`BinaryCodec`], [`JsonCodec`] and, with the `ron` feature, [`RonCodec`].
//! [`EncryptedCodec`] wraps any of them and seals the byte stream.

#![warn(missing_docs)]

mod binary;
pub mod encrypted;
mod json;
#[cfg(feature = "ron")]
mod ron_codec;

pub use binary::BinaryCodec;
pub use encrypted::EncryptedCodec;
pub use json::JsonCodec;
#[cfg(feature = "ron")]
pub use ron_codec::RonCodec;

use std::io::Read;

/// Reads a whole source into memory.
///
/// Formats that decode from a slice, and the encryption decorator, need the
/// complete payload before they can start.
pub(crate) fn read_all(source: &mut dyn Read) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    Ok(bytes)
}
