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

//! Defines the abstract contract for serialization codecs.
//!
//! The core of this module is the [`Codec`] trait, which provides a unified,
//! object-safe interface for every serialization method. This allows the
//! method registry to cache codecs as `Arc<dyn Codec>` and dispatch to them
//! polymorphically. The typed conveniences callers actually use live on
//! [`CodecExt`], which is implemented for every codec.

mod descriptor;

pub use descriptor::{DescriptorSeed, TypeDescriptor};

use crate::error::{PersistResult, PersistenceError};
use crate::method::MethodKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::io::{Read, Write};

/// The contract for one serialization strategy.
///
/// Implementations hold only configuration captured at construction and are
/// shared between threads, so every method takes `&self`.
pub trait Codec: Send + Sync {
    /// Returns the method this codec implements.
    fn kind(&self) -> MethodKind;

    /// Serializes `value` into `sink`.
    ///
    /// The sink belongs to the caller: it is flushed but never closed.
    fn encode(&self, value: &dyn erased_serde::Serialize, sink: &mut dyn Write)
        -> PersistResult<()>;

    /// Deserializes one value of the type described by `descriptor` from `source`.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Decode`] if the bytes do not have the shape
    /// the described type expects.
    fn decode(
        &self,
        descriptor: &TypeDescriptor,
        source: &mut dyn Read,
    ) -> PersistResult<Box<dyn Any + Send>>;

    /// Produces an independent copy of `value` by encoding it into memory and
    /// decoding it back as the described type.
    ///
    /// Only what the codec serializes is copied. Fields skipped by serde come
    /// back with their deserialization defaults.
    fn copy(
        &self,
        value: &dyn erased_serde::Serialize,
        descriptor: &TypeDescriptor,
    ) -> PersistResult<Box<dyn Any + Send>> {
        let mut buffer = Vec::new();
        self.encode(value, &mut buffer)?;
        self.decode(descriptor, &mut buffer.as_slice())
    }
}

/// Typed helpers over any [`Codec`], including `dyn Codec`.
pub trait CodecExt: Codec {
    /// Serializes a concrete value into `sink`.
    fn encode_value<T: Serialize>(&self, value: &T, sink: &mut dyn Write) -> PersistResult<()> {
        self.encode(value, sink)
    }

    /// Deserializes a `T` from `source`.
    fn decode_value<T>(&self, source: &mut dyn Read) -> PersistResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let boxed = self.decode(&TypeDescriptor::of::<T>(), source)?;
        downcast(boxed)
    }

    /// Deep-copies `value` through this codec's encoding.
    fn copy_value<T>(&self, value: &T) -> PersistResult<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let boxed = self.copy(value, &TypeDescriptor::of::<T>())?;
        downcast(boxed)
    }
}

impl<C: Codec + ?Sized> CodecExt for C {}

/// Unboxes a decoded value, failing with [`PersistenceError::TypeMismatch`]
/// if it is not a `T`.
pub fn downcast<T: 'static>(boxed: Box<dyn Any + Send>) -> PersistResult<T> {
    boxed
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| PersistenceError::TypeMismatch {
            expected: std::any::type_name::<T>(),
        })
}
