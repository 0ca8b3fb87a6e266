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

//! # Coffer
//!
//! Saves and loads serializable objects as named files, with the encoding
//! chosen per call from a set of pluggable methods: compact binary, readable
//! JSON or RON, and authenticated-encrypted variants of binary and JSON.
//!
//! The [`PersistenceManager`] is the entry point. It owns a
//! [`MethodRegistry`] that builds each codec lazily and shares it afterwards.
//!
//! ```no_run
//! use coffer::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Progress {
//!     score: u32,
//! }
//!
//! # fn main() -> PersistResult<()> {
//! let manager = PersistenceManager::new(PersistenceConfig::default());
//! manager.save(&Progress { score: 42 }, "save1.dat", None)?;
//! let loaded: Option<Progress> = manager.load("save1.dat", None)?;
//! assert_eq!(loaded.map(|p| p.score), Some(42));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod manager;
pub mod registry;

pub use coffer_codecs::{BinaryCodec, EncryptedCodec, JsonCodec};
#[cfg(feature = "ron")]
pub use coffer_codecs::RonCodec;
pub use coffer_core::{
    Codec, CodecExt, FileSystem, MethodKind, PersistResult, PersistenceConfig, PersistenceError,
    SaveTarget, TypeDescriptor,
};
pub use coffer_io::{LocalFileSystem, MemoryFileSystem};
pub use manager::PersistenceManager;
pub use registry::{CodecFactory, MethodRegistry};

/// The types most callers need.
pub mod prelude {
    pub use crate::{
        MethodKind, PersistResult, PersistenceConfig, PersistenceError, PersistenceManager,
    };
}
