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

//! # Coffer Core
//!
//! Foundational crate containing the codec contract, method identifiers,
//! configuration and error types shared by every other coffer crate.
//!
//! Nothing in here knows about a concrete file format or cipher; those live in
//! `coffer-codecs`. The filesystem is likewise only described here, as the
//! [`FileSystem`] collaborator trait, and implemented in `coffer-io`.

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod method;
pub mod target;

pub use codec::{Codec, CodecExt, DescriptorSeed, TypeDescriptor};
pub use config::PersistenceConfig;
pub use error::{PersistResult, PersistenceError};
pub use fs::FileSystem;
pub use method::MethodKind;
pub use target::SaveTarget;
