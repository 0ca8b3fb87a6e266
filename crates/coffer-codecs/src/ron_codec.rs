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

//! The RON codec, available with the `ron` feature.

use crate::read_all;
use coffer_core::{Codec, MethodKind, PersistResult, PersistenceError, TypeDescriptor};
use ron::ser::PrettyConfig;
use std::any::Any;
use std::io::{Read, Write};

/// A codec that writes pretty-printed RON with two-space indentation.
///
/// Struct names are written out, which makes files easy to diff and edit by
/// hand. Like JSON, unknown fields are ignored on decode.
#[derive(Debug, Default)]
pub struct RonCodec;

impl RonCodec {
    /// Creates a new RON codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for RonCodec {
    fn kind(&self) -> MethodKind {
        MethodKind::Ron
    }

    fn encode(
        &self,
        value: &dyn erased_serde::Serialize,
        sink: &mut dyn Write,
    ) -> PersistResult<()> {
        let pretty_config = PrettyConfig::default()
            .indentor("  ".to_string())
            .struct_names(true);
        let text = ron::ser::to_string_pretty(&value, pretty_config)
            .map_err(|e| PersistenceError::encode(MethodKind::Ron, e))?;
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    fn decode(
        &self,
        descriptor: &TypeDescriptor,
        source: &mut dyn Read,
    ) -> PersistResult<Box<dyn Any + Send>> {
        let bytes = read_all(source)?;
        ron::Options::default()
            .from_bytes_seed(&bytes, descriptor.seed())
            .map_err(|e| PersistenceError::decode(MethodKind::Ron, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::CodecExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Difficulty {
        Easy,
        Hard { permadeath: bool },
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Campaign {
        chapter: u8,
        difficulty: Difficulty,
    }

    #[test]
    fn round_trip_with_enums() {
        let codec = RonCodec::new();
        let campaign = Campaign {
            chapter: 3,
            difficulty: Difficulty::Hard { permadeath: true },
        };
        let mut buffer = Vec::new();
        codec.encode_value(&campaign, &mut buffer).unwrap();

        let text = std::str::from_utf8(&buffer).unwrap();
        assert!(text.contains("Campaign"));

        let decoded: Campaign = codec.decode_value(&mut buffer.as_slice()).unwrap();
        assert_eq!(decoded, campaign);
    }

    #[test]
    fn malformed_text_is_a_decode_error() {
        let err = RonCodec::new()
            .decode_value::<Campaign>(&mut &b"Campaign(chapter: "[..])
            .unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Decode {
                kind: MethodKind::Ron,
                ..
            }
        ));
    }

    #[test]
    fn copy_keeps_variants() {
        let original = Campaign {
            chapter: 1,
            difficulty: Difficulty::Easy,
        };
        assert_eq!(RonCodec::new().copy_value(&original).unwrap(), original);
    }
}
