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

//! Runtime descriptors for the type a codec should decode into.
//!
//! Codecs are stored as trait objects, so they cannot be generic over the
//! decoded type. A [`TypeDescriptor`] carries that type instead: it holds a
//! monomorphised function that drives any erased deserializer and boxes the
//! result.

use serde::de::{DeserializeOwned, DeserializeSeed, Deserializer, Error as _};
use std::any::{Any, TypeId};
use std::fmt;

type DecodeFn = for<'de> fn(
    &mut dyn erased_serde::Deserializer<'de>,
) -> Result<Box<dyn Any + Send>, erased_serde::Error>;

/// Describes a decodable type without naming it statically.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    type_name: &'static str,
    type_id: TypeId,
    decode: DecodeFn,
}

impl TypeDescriptor {
    /// Builds the descriptor for `T`.
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            decode: decode_erased::<T>,
        }
    }

    /// The fully qualified name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The [`TypeId`] of the described type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if this descriptor describes `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Decodes one value of the described type from an erased deserializer.
    pub fn decode_from<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Box<dyn Any + Send>, erased_serde::Error> {
        (self.decode)(deserializer)
    }

    /// Adapts this descriptor to serde's [`DeserializeSeed`].
    pub fn seed(&self) -> DescriptorSeed<'_> {
        DescriptorSeed(self)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

fn decode_erased<T>(
    deserializer: &mut dyn erased_serde::Deserializer<'_>,
) -> Result<Box<dyn Any + Send>, erased_serde::Error>
where
    T: DeserializeOwned + Send + 'static,
{
    let value: T = erased_serde::deserialize(deserializer)?;
    Ok(Box::new(value))
}

/// A [`DeserializeSeed`] that decodes into the type of a [`TypeDescriptor`].
///
/// This is how concrete formats hand their own deserializer to a descriptor.
pub struct DescriptorSeed<'a>(&'a TypeDescriptor);

impl<'de> DeserializeSeed<'de> for DescriptorSeed<'_> {
    type Value = Box<dyn Any + Send>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        self.0.decode_from(&mut erased).map_err(D::Error::custom)
    }
}
