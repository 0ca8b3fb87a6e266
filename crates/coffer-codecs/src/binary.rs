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

//! The compact binary codec.

use crate::read_all;
use bincode::config;
use coffer_core::{Codec, MethodKind, PersistResult, PersistenceError, TypeDescriptor};
use std::any::Any;
use std::io::{Read, Write};

/// A codec that writes values with bincode's standard (varint) configuration.
///
/// The output is small and opaque. The format is not self-describing, so:
/// - types whose `Deserialize` impl needs `deserialize_any` (untagged enums,
///   `serde_json::Value`) cannot be decoded,
/// - fields must match exactly; an added or removed field breaks old files,
/// - bytes after the decoded value are ignored.
#[derive(Debug, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    /// Creates a new binary codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for BinaryCodec {
    fn kind(&self) -> MethodKind {
        MethodKind::Binary
    }

    fn encode(
        &self,
        value: &dyn erased_serde::Serialize,
        sink: &mut dyn Write,
    ) -> PersistResult<()> {
        let mut writer = &mut *sink;
        bincode::serde::encode_into_std_write(value, &mut writer, config::standard())
            .map_err(|e| PersistenceError::encode(MethodKind::Binary, e))?;
        sink.flush()?;
        Ok(())
    }

    fn decode(
        &self,
        descriptor: &TypeDescriptor,
        source: &mut dyn Read,
    ) -> PersistResult<Box<dyn Any + Send>> {
        let bytes = read_all(source)?;
        let (value, _read) =
            bincode::serde::seed_decode_from_slice(descriptor.seed(), &bytes, config::standard())
                .map_err(|e| PersistenceError::decode(MethodKind::Binary, e))?;
        Ok(value)
    }
}
