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

//! I/O services for coffer: implementations of the [`FileSystem`] collaborator.
//!
//! - [`LocalFileSystem`] stores files on disk and replaces them atomically.
//! - [`MemoryFileSystem`] keeps files in a map, for tests and tools that must
//!   not touch the disk.
//!
//! [`FileSystem`]: coffer_core::FileSystem

#![warn(missing_docs)]

mod local;
mod memory;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;
