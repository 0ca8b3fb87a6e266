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

//! The error type shared by every persistence operation.

use crate::method::MethodKind;
use thiserror::Error;

/// A convenience alias for results produced by coffer.
pub type PersistResult<T> = Result<T, PersistenceError>;

/// An error that can occur while resolving a codec or persisting an object.
///
/// A missing file is not represented here: loading it yields `Ok(None)` and
/// deleting it succeeds.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// An encrypted method was requested while its key material is unusable.
    #[error("Invalid configuration for method {kind}: {reason}")]
    Configuration {
        /// The method whose codec could not be built.
        kind: MethodKind,
        /// Why the configuration was rejected.
        reason: String,
    },

    /// The requested method is not part of the recognized set.
    #[error("Unsupported serialization method: {0}")]
    UnsupportedMethod(MethodKind),

    /// The bytes read from a source do not match the requested type.
    #[error("Failed to decode {kind} data: {message}")]
    Decode {
        /// The method used to decode.
        kind: MethodKind,
        /// The underlying decoder message.
        message: String,
    },

    /// The object could not be turned into bytes.
    #[error("Failed to encode {kind} data: {message}")]
    Encode {
        /// The method used to encode.
        kind: MethodKind,
        /// The underlying encoder message.
        message: String,
    },

    /// A decoded value was not of the type the caller asked for.
    #[error("Decoded value is not a `{expected}`")]
    TypeMismatch {
        /// Name of the requested type.
        expected: &'static str,
    },

    /// A configuration manifest could not be parsed.
    #[error("Invalid persistence configuration: {0}")]
    InvalidConfig(String),

    /// A file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    /// Builds a [`PersistenceError::Decode`] from any displayable error.
    pub fn decode(kind: MethodKind, err: impl std::fmt::Display) -> Self {
        PersistenceError::Decode {
            kind,
            message: err.to_string(),
        }
    }

    /// Builds a [`PersistenceError::Encode`] from any displayable error.
    pub fn encode(kind: MethodKind, err: impl std::fmt::Display) -> Self {
        PersistenceError::Encode {
            kind,
            message: err.to_string(),
        }
    }
}
