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

//! The filesystem collaborator contract.
//!
//! Persistence only ever hands a [`SaveTarget`] to a [`FileSystem`]; building
//! paths, creating directories and committing writes is entirely up to the
//! implementation.

use crate::error::PersistResult;
use crate::target::SaveTarget;
use std::io::{Read, Write};
use std::path::Path;

/// The callback a [`FileSystem`] runs against an open sink.
pub type WriteFn<'a> = dyn FnMut(&mut dyn Write) -> PersistResult<()> + 'a;

/// Byte-level storage for persisted objects.
pub trait FileSystem: Send + Sync {
    /// Opens a writable sink for `target`, creating parent directories as
    /// needed, and runs `write` against it.
    ///
    /// The file is only created or replaced if `write` succeeds. The sink is
    /// released on every exit path.
    fn write_with(&self, target: &SaveTarget, write: &mut WriteFn<'_>) -> PersistResult<()>;

    /// Opens a readable source for `target`, or `None` if no such file exists.
    fn open_read(&self, target: &SaveTarget) -> PersistResult<Option<Box<dyn Read + Send>>>;

    /// Removes the file at `target`. Removing an absent file is not an error.
    fn remove(&self, target: &SaveTarget) -> PersistResult<()>;

    /// Returns `true` if a file exists at `target`.
    fn exists(&self, target: &SaveTarget) -> PersistResult<bool>;

    /// Lists the file names stored directly in `folder`, sorted.
    ///
    /// A folder that does not exist lists as empty.
    fn list(&self, base_directory: &Path, folder: &str) -> PersistResult<Vec<String>>;
}
