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

//! In-memory storage.

use coffer_core::fs::WriteFn;
use coffer_core::target::folder_path;
use coffer_core::{FileSystem, PersistResult, SaveTarget};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// A [`FileSystem`] that keeps every file in a shared map keyed by path.
///
/// Clones share the same storage, so a test can hand one clone to a manager
/// and inspect the raw bytes through another.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the raw bytes stored at `target`.
    pub fn bytes(&self, target: &SaveTarget) -> Option<Vec<u8>> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&target.path())
            .cloned()
    }

    /// Stores raw bytes at `target`, bypassing any codec.
    pub fn insert_bytes(&self, target: &SaveTarget, bytes: Vec<u8>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.path(), bytes);
    }

    /// The number of stored files.
    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no file is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSystem for MemoryFileSystem {
    fn write_with(&self, target: &SaveTarget, write: &mut WriteFn<'_>) -> PersistResult<()> {
        // Buffer first so a failed encode leaves the previous content in place.
        let mut buffer = Vec::new();
        write(&mut buffer)?;
        self.insert_bytes(target, buffer);
        log::trace!("Wrote '{target}' to memory.");
        Ok(())
    }

    fn open_read(&self, target: &SaveTarget) -> PersistResult<Option<Box<dyn Read + Send>>> {
        Ok(self
            .bytes(target)
            .map(|bytes| Box::new(Cursor::new(bytes)) as Box<dyn Read + Send>))
    }

    fn remove(&self, target: &SaveTarget) -> PersistResult<()> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&target.path());
        Ok(())
    }

    fn exists(&self, target: &SaveTarget) -> PersistResult<bool> {
        Ok(self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&target.path()))
    }

    fn list(&self, base_directory: &Path, folder: &str) -> PersistResult<Vec<String>> {
        let directory = folder_path(base_directory, folder);
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);

        let mut names: Vec<String> = files
            .keys()
            .filter(|path| path.parent() == Some(directory.as_path()))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}
