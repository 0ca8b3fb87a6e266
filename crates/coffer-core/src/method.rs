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

//! Identifiers for the available serialization methods.
//!
//! A [`MethodKind`] is what callers and configuration files name; the registry
//! in the `coffer` crate maps each kind to a live codec instance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects which codec family is used to persist an object.
///
/// The set is closed apart from [`MethodKind::Custom`], whose ids are bound to
/// codecs at runtime through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MethodKind {
    /// Alias for [`MethodKind::DEFAULT_TARGET`]. Never a codec of its own.
    #[default]
    Default,
    /// Compact, opaque binary encoding.
    Binary,
    /// Human-readable JSON.
    Json,
    /// Human-readable RON. Only available when the `ron` feature is enabled.
    Ron,
    /// [`MethodKind::Binary`] wrapped in the encryption decorator.
    BinaryEncrypted,
    /// [`MethodKind::Json`] wrapped in the encryption decorator.
    JsonEncrypted,
    /// A codec registered at runtime under the given id.
    Custom(u32),
}

impl MethodKind {
    /// The concrete kind that [`MethodKind::Default`] stands for.
    pub const DEFAULT_TARGET: MethodKind = MethodKind::Json;

    /// Resolves the `Default` alias. Every other kind is returned unchanged.
    ///
    /// The result is never `Default`.
    pub fn resolve_alias(self) -> MethodKind {
        match self {
            MethodKind::Default => Self::DEFAULT_TARGET,
            other => other,
        }
    }

    /// Returns `true` for the kinds that go through the encryption decorator.
    pub fn is_encrypted(self) -> bool {
        matches!(
            self.resolve_alias(),
            MethodKind::BinaryEncrypted | MethodKind::JsonEncrypted
        )
    }

    /// The plain kind an encrypted kind wraps, or `None` for plain kinds.
    pub fn inner_kind(self) -> Option<MethodKind> {
        match self.resolve_alias() {
            MethodKind::BinaryEncrypted => Some(MethodKind::Binary),
            MethodKind::JsonEncrypted => Some(MethodKind::Json),
            _ => None,
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::Default => write!(f, "Default"),
            MethodKind::Binary => write!(f, "Binary"),
            MethodKind::Json => write!(f, "Json"),
            MethodKind::Ron => write!(f, "Ron"),
            MethodKind::BinaryEncrypted => write!(f, "BinaryEncrypted"),
            MethodKind::JsonEncrypted => write!(f, "JsonEncrypted"),
            MethodKind::Custom(id) => write!(f, "Custom({id})"),
        }
    }
}
