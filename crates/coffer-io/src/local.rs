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

//! Disk-backed storage.

use coffer_core::fs::WriteFn;
use coffer_core::target::folder_path;
use coffer_core::{FileSystem, PersistResult, SaveTarget};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::Builder;

// Staged writes are hidden from `list` by this prefix.
const STAGING_PREFIX: &str = ".coffer-stage-";

/// Stores files under their [`SaveTarget::path`] on the local disk.
///
/// Writes go to a temporary file in the destination directory which is then
/// renamed over the target, so a failed encode never leaves a truncated save
/// behind and an existing save is kept intact.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Creates a new local filesystem collaborator.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn write_with(&self, target: &SaveTarget, write: &mut WriteFn<'_>) -> PersistResult<()> {
        let directory = target.directory();
        fs::create_dir_all(&directory)?;

        // Dropping the temp file on an early return deletes it.
        let mut staged = Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&directory)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            write(&mut writer)?;
            writer.flush()?;
        }
        staged.as_file().sync_all()?;
        staged.persist(target.path()).map_err(|e| e.error)?;

        log::trace!("Wrote '{target}'.");
        Ok(())
    }

    fn open_read(&self, target: &SaveTarget) -> PersistResult<Option<Box<dyn Read + Send>>> {
        match File::open(target.path()) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, target: &SaveTarget) -> PersistResult<()> {
        match fs::remove_file(target.path()) {
            Ok(()) => {
                log::trace!("Removed '{target}'.");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, target: &SaveTarget) -> PersistResult<bool> {
        match fs::metadata(target.path()) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, base_directory: &Path, folder: &str) -> PersistResult<Vec<String>> {
        let entries = match fs::read_dir(folder_path(base_directory, folder)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if !name.starts_with(STAGING_PREFIX) => names.push(name),
                _ => {}
            }
        }
        names.sort();
        Ok(names)
    }
}
