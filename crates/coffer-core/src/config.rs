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

//! Configuration of a persistence manager.
//!
//! The configuration can be built in code or read from a `Persistence.toml`
//! manifest such as:
//!
//! ```toml
//! base_directory = "GameData"
//! default_folder = "SaveData"
//! default_method = "JsonEncrypted"
//! encryption_key = "correct horse"
//! encryption_salt = "battery staple"
//! ```

use crate::error::{PersistResult, PersistenceError};
use crate::method::MethodKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The settings a persistence manager is built from.
///
/// Key and salt are not validated here. An encrypted codec checks them when it
/// is first constructed, so a configuration may be assembled in any order.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Root directory for every save.
    pub base_directory: PathBuf,
    /// Folder used when a call does not name one.
    pub default_folder: String,
    /// Method used when a call does not name one.
    pub default_method: MethodKind,
    /// Secret for the encrypted methods.
    pub encryption_key: String,
    /// Salt for the encrypted methods.
    pub encryption_salt: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("GameData"),
            default_folder: "SaveData".to_string(),
            default_method: MethodKind::Json,
            encryption_key: String::new(),
            encryption_salt: String::new(),
        }
    }
}

impl PersistenceConfig {
    /// Parses a configuration from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> PersistResult<Self> {
        toml::from_str(text).map_err(|e| PersistenceError::InvalidConfig(e.to_string()))
    }

    /// Reads a configuration manifest from disk.
    ///
    /// A missing file yields [`PersistenceConfig::default`].
    pub fn load(path: impl AsRef<Path>) -> PersistResult<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "No persistence manifest at '{}', using defaults.",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> PersistResult<String> {
        toml::to_string(self).map_err(|e| PersistenceError::InvalidConfig(e.to_string()))
    }

    /// Sets the base directory.
    pub fn with_base_directory(mut self, base_directory: impl Into<PathBuf>) -> Self {
        self.base_directory = base_directory.into();
        self
    }

    /// Sets the default folder.
    pub fn with_default_folder(mut self, folder: impl Into<String>) -> Self {
        self.default_folder = folder.into();
        self
    }

    /// Sets the default method.
    pub fn with_default_method(mut self, method: MethodKind) -> Self {
        self.default_method = method;
        self
    }

    /// Sets the key and salt used by the encrypted methods.
    pub fn with_encryption(mut self, key: impl Into<String>, salt: impl Into<String>) -> Self {
        self.encryption_key = key.into();
        self.encryption_salt = salt.into();
        self
    }

    /// Returns `true` if the default method is one of the encrypted kinds.
    pub fn is_encrypted(&self) -> bool {
        self.default_method.is_encrypted()
    }
}

// Key material stays out of logs.
impl fmt::Debug for PersistenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(secret: &str) -> &'static str {
            if secret.is_empty() {
                "<empty>"
            } else {
                "<redacted>"
            }
        }

        f.debug_struct("PersistenceConfig")
            .field("base_directory", &self.base_directory)
            .field("default_folder", &self.default_folder)
            .field("default_method", &self.default_method)
            .field("encryption_key", &redact(&self.encryption_key))
            .field("encryption_salt", &redact(&self.encryption_salt))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PersistenceConfig::default();
        assert_eq!(config.base_directory, PathBuf::from("GameData"));
        assert_eq!(config.default_folder, "SaveData");
        assert_eq!(config.default_method, MethodKind::Json);
        assert!(config.encryption_key.is_empty());
        assert!(!config.is_encrypted());
    }

    #[test]
    fn parses_partial_manifest() {
        let config = PersistenceConfig::from_toml_str(
            r#"
            default_method = "BinaryEncrypted"
            encryption_key = "k"
            encryption_salt = "s"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_method, MethodKind::BinaryEncrypted);
        assert_eq!(config.default_folder, "SaveData");
        assert!(config.is_encrypted());
    }

    #[test]
    fn rejects_unknown_method() {
        let err = PersistenceConfig::from_toml_str(r#"default_method = "Xml""#).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidConfig(_)));
    }

    #[test]
    fn manifest_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Persistence.toml");
        let config = PersistenceConfig::default()
            .with_base_directory("Saves")
            .with_default_folder("Slots")
            .with_default_method(MethodKind::Binary);

        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(PersistenceConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_manifest_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersistenceConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PersistenceConfig::default());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = PersistenceConfig::default().with_encryption("hunter2", "pepper");
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("pepper"));
        assert!(printed.contains("<redacted>"));
    }
}
