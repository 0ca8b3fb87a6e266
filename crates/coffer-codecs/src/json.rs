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

//! The human-readable JSON codec.

use coffer_core::{Codec, MethodKind, PersistResult, PersistenceError, TypeDescriptor};
use serde::de::DeserializeSeed;
use std::any::Any;
use std::io::{BufReader, Read, Write};

/// A codec that writes pretty-printed JSON.
///
/// Unknown fields in a file are ignored unless the target type denies them
/// with `#[serde(deny_unknown_fields)]`. Anything other than whitespace after
/// the value is rejected.
#[derive(Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Creates a new JSON codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn kind(&self) -> MethodKind {
        MethodKind::Json
    }

    fn encode(
        &self,
        value: &dyn erased_serde::Serialize,
        sink: &mut dyn Write,
    ) -> PersistResult<()> {
        serde_json::to_writer_pretty(&mut *sink, &value)
            .map_err(|e| PersistenceError::encode(MethodKind::Json, e))?;
        sink.flush()?;
        Ok(())
    }

    fn decode(
        &self,
        descriptor: &TypeDescriptor,
        source: &mut dyn Read,
    ) -> PersistResult<Box<dyn Any + Send>> {
        let mut de = serde_json::Deserializer::from_reader(BufReader::new(source));
        let value = descriptor
            .seed()
            .deserialize(&mut de)
            .map_err(|e| PersistenceError::decode(MethodKind::Json, e))?;
        de.end()
            .map_err(|e| PersistenceError::decode(MethodKind::Json, e))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::CodecExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Settings {
        volume: f32,
        language: String,
        #[serde(default)]
        subtitles: Option<bool>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Score {
        score: i32,
    }

    #[test]
    fn output_is_readable_text() {
        let mut buffer = Vec::new();
        JsonCodec::new()
            .encode_value(&Score { score: 42 }, &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"score\": 42"));
    }

    #[test]
    fn round_trip_preserves_structure() {
        let codec = JsonCodec::new();
        let settings = Settings {
            volume: 0.5,
            language: "fr".to_string(),
            subtitles: Some(true),
        };
        let mut buffer = Vec::new();
        codec.encode_value(&settings, &mut buffer).unwrap();

        let decoded: Settings = codec.decode_value(&mut buffer.as_slice()).unwrap();
        assert_eq!(decoded, settings);
    }

    #[test]
    fn tolerates_unknown_and_missing_optional_fields() {
        let text = br#"{ "volume": 1.0, "language": "en", "legacy": 3 }"#;
        let decoded: Settings = JsonCodec::new().decode_value(&mut &text[..]).unwrap();
        assert_eq!(decoded.subtitles, None);
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let text = br#"{ "score": "lots" }"#;
        let err = JsonCodec::new()
            .decode_value::<Score>(&mut &text[..])
            .unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Decode {
                kind: MethodKind::Json,
                ..
            }
        ));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let text = br#"{ "score": 1 } trailing"#;
        assert!(JsonCodec::new()
            .decode_value::<Score>(&mut &text[..])
            .is_err());
    }
}
