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

//! The logical address of a persisted object.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where an object lives: a base directory, a folder under it, and a filename.
///
/// The three parts are kept separate; only filesystem collaborators join them
/// into a physical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SaveTarget {
    /// The root directory every folder is resolved against.
    pub base_directory: PathBuf,
    /// The folder under the base directory. May be empty.
    pub folder: String,
    /// The file name inside the folder.
    pub filename: String,
}

impl SaveTarget {
    /// Creates a target from its three components.
    pub fn new(
        base_directory: impl Into<PathBuf>,
        folder: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            base_directory: base_directory.into(),
            folder: folder.into(),
            filename: filename.into(),
        }
    }

    /// The directory that holds the file.
    pub fn directory(&self) -> PathBuf {
        folder_path(&self.base_directory, &self.folder)
    }

    /// The full path of the file.
    pub fn path(&self) -> PathBuf {
        self.directory().join(&self.filename)
    }
}

/// Joins a base directory and a folder, treating an empty folder as the base itself.
pub fn folder_path(base_directory: &Path, folder: &str) -> PathBuf {
    if folder.is_empty() {
        base_directory.to_path_buf()
    } else {
        base_directory.join(folder)
    }
}

impl fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_all_components() {
        let target = SaveTarget::new("GameData", "SaveData", "save1.dat");
        assert_eq!(
            target.path(),
            PathBuf::from("GameData").join("SaveData").join("save1.dat")
        );
        assert_eq!(target.directory(), PathBuf::from("GameData").join("SaveData"));
    }

    #[test]
    fn empty_folder_resolves_to_base() {
        let target = SaveTarget::new("GameData", "", "settings.json");
        assert_eq!(target.path(), PathBuf::from("GameData").join("settings.json"));
    }
}
