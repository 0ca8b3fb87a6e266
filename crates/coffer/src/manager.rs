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

//! The public-facing persistence façade.
//!
//! A [`PersistenceManager`] resolves which method and folder a call uses,
//! fetches the codec from its [`MethodRegistry`], and lets the
//! [`FileSystem`] collaborator run the codec against the file.

use crate::registry::MethodRegistry;
use coffer_core::codec::downcast;
use coffer_core::{
    Codec, CodecExt, FileSystem, MethodKind, PersistResult, PersistenceConfig, SaveTarget,
    TypeDescriptor,
};
use coffer_io::LocalFileSystem;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Saves and loads objects as named files under a configured directory.
///
/// Every operation takes an optional folder; `None` means the configured
/// default folder. The plain operations use the configured default method,
/// the `*_with_method` variants take one explicitly.
///
/// The configuration is fixed for the manager's lifetime. The manager is
/// `Send + Sync` and can be shared behind an `Arc`.
pub struct PersistenceManager {
    config: PersistenceConfig,
    registry: MethodRegistry,
    fs: Arc<dyn FileSystem>,
}

impl PersistenceManager {
    /// Creates a manager that stores files on the local disk.
    pub fn new(config: PersistenceConfig) -> Self {
        Self::with_file_system(config, Arc::new(LocalFileSystem::new()))
    }

    /// Creates a manager backed by the given filesystem collaborator.
    pub fn with_file_system(config: PersistenceConfig, fs: Arc<dyn FileSystem>) -> Self {
        let registry = MethodRegistry::from_config(&config);
        let manager = Self {
            config,
            registry,
            fs,
        };
        manager.activate();
        manager
    }

    fn activate(&self) {
        self.registry.reset();
        log::info!(
            "Persistence manager active: base '{}', folder '{}', method {}.",
            self.config.base_directory.display(),
            self.config.default_folder,
            self.config.default_method,
        );
    }

    /// Re-runs activation: every cached codec is discarded and rebuilt on
    /// next use, as after a restart. Configuration is unchanged.
    pub fn reinitialize(&self) {
        self.activate();
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// The codec cache.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Returns `true` if the configured default method is encrypted.
    ///
    /// Methods passed to the `*_with_method` calls are not considered.
    pub fn is_encrypted(&self) -> bool {
        self.config.is_encrypted()
    }

    /// Returns the codec for `kind`, constructing it on first use.
    pub fn codec(&self, kind: MethodKind) -> PersistResult<Arc<dyn Codec>> {
        self.registry.resolve(kind)
    }

    /// Registers a custom codec factory and returns the kind that selects it.
    pub fn register_method<F>(&self, id: u32, factory: F) -> MethodKind
    where
        F: Fn() -> PersistResult<Arc<dyn Codec>> + Send + Sync + 'static,
    {
        self.registry.register_custom(id, factory)
    }

    /// The logical address of `filename` in `folder`, or in the default folder.
    pub fn target(&self, filename: &str, folder: Option<&str>) -> SaveTarget {
        SaveTarget::new(
            self.config.base_directory.clone(),
            folder.unwrap_or(&self.config.default_folder),
            filename,
        )
    }

    /// Saves `value` with the default method, creating or replacing the file.
    pub fn save<T: Serialize>(
        &self,
        value: &T,
        filename: &str,
        folder: Option<&str>,
    ) -> PersistResult<()> {
        self.save_with_method(self.config.default_method, value, filename, folder)
    }

    /// Saves `value` with an explicit method, ignoring the configured default.
    pub fn save_with_method<T: Serialize>(
        &self,
        kind: MethodKind,
        value: &T,
        filename: &str,
        folder: Option<&str>,
    ) -> PersistResult<()> {
        let codec = self.registry.resolve(kind)?;
        let target = self.target(filename, folder);
        log::trace!("Saving '{target}' with {}.", codec.kind());
        self.fs
            .write_with(&target, &mut |sink| codec.encode(value, sink))
    }

    /// Loads a `T` with the default method.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load<T>(&self, filename: &str, folder: Option<&str>) -> PersistResult<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.load_with_method(self.config.default_method, filename, folder)
    }

    /// Loads a `T` with an explicit method.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load_with_method<T>(
        &self,
        kind: MethodKind,
        filename: &str,
        folder: Option<&str>,
    ) -> PersistResult<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.load_dyn_with_method(kind, &TypeDescriptor::of::<T>(), filename, folder)?
            .map(downcast::<T>)
            .transpose()
    }

    /// Loads a value of the described type with the default method.
    pub fn load_dyn(
        &self,
        descriptor: &TypeDescriptor,
        filename: &str,
        folder: Option<&str>,
    ) -> PersistResult<Option<Box<dyn Any + Send>>> {
        self.load_dyn_with_method(self.config.default_method, descriptor, filename, folder)
    }

    /// Loads a value of the described type with an explicit method.
    ///
    /// The method is resolved before the file is looked up, so a misconfigured
    /// encrypted method fails even when the file is absent.
    pub fn load_dyn_with_method(
        &self,
        kind: MethodKind,
        descriptor: &TypeDescriptor,
        filename: &str,
        folder: Option<&str>,
    ) -> PersistResult<Option<Box<dyn Any + Send>>> {
        let codec = self.registry.resolve(kind)?;
        let target = self.target(filename, folder);

        let Some(mut source) = self.fs.open_read(&target)? else {
            log::trace!("Nothing saved at '{target}'.");
            return Ok(None);
        };

        log::trace!(
            "Loading '{target}' as {} with {}.",
            descriptor.type_name(),
            codec.kind()
        );
        codec.decode(descriptor, &mut source).map(Some)
    }

    /// Deletes a file. Deleting a file that does not exist is not an error.
    pub fn delete(&self, filename: &str, folder: Option<&str>) -> PersistResult<()> {
        let target = self.target(filename, folder);
        log::trace!("Deleting '{target}'.");
        self.fs.remove(&target)
    }

    /// Returns `true` if a file has been saved under `filename`.
    pub fn exists(&self, filename: &str, folder: Option<&str>) -> PersistResult<bool> {
        self.fs.exists(&self.target(filename, folder))
    }

    /// Lists the files saved in `folder`, sorted by name.
    pub fn list(&self, folder: Option<&str>) -> PersistResult<Vec<String>> {
        self.fs.list(
            &self.config.base_directory,
            folder.unwrap_or(&self.config.default_folder),
        )
    }

    /// Deep-copies `value` by round-tripping it through the default method's codec.
    pub fn copy<T>(&self, value: &T) -> PersistResult<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.registry
            .resolve(self.config.default_method)?
            .copy_value(value)
    }
}

impl fmt::Debug for PersistenceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceManager")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
