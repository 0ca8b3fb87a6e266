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

//! The lazy, per-method codec cache.
//!
//! A [`MethodRegistry`] owns at most one codec per [`MethodKind`]. Codecs are
//! built on first request and shared afterwards, which matters for encrypted
//! codecs that carry a derived cipher. [`MethodRegistry::reset`] discards every
//! instance so the next request rebuilds from scratch.

use coffer_codecs::{BinaryCodec, EncryptedCodec, JsonCodec};
use coffer_core::{Codec, MethodKind, PersistResult, PersistenceConfig, PersistenceError};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

/// Builds the codec for a custom method.
pub type CodecFactory = dyn Fn() -> PersistResult<Arc<dyn Codec>> + Send + Sync;

// Each kind gets its own slot so constructing one kind never blocks another.
type Slot = Arc<Mutex<Option<Arc<dyn Codec>>>>;

/// Maps method kinds to lazily constructed, cached codec instances.
pub struct MethodRegistry {
    encryption_key: String,
    encryption_salt: String,
    slots: RwLock<HashMap<MethodKind, Slot>>,
    custom: RwLock<HashMap<u32, Arc<CodecFactory>>>,
}

impl MethodRegistry {
    /// Creates an empty registry that will key encrypted codecs with `key` and `salt`.
    pub fn new(key: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            encryption_key: key.into(),
            encryption_salt: salt.into(),
            slots: RwLock::new(HashMap::new()),
            custom: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an empty registry using the key material of `config`.
    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self::new(
            config.encryption_key.clone(),
            config.encryption_salt.clone(),
        )
    }

    /// Returns the codec for `kind`, constructing it on first request.
    ///
    /// `Default` is an alias: it resolves to [`MethodKind::DEFAULT_TARGET`] and
    /// shares that kind's instance.
    ///
    /// # Errors
    /// - [`PersistenceError::Configuration`] if an encrypted kind is requested
    ///   while the key or salt is empty. Nothing is cached in that case.
    /// - [`PersistenceError::UnsupportedMethod`] for kinds this build cannot
    ///   serve, such as an unregistered custom id.
    pub fn resolve(&self, kind: MethodKind) -> PersistResult<Arc<dyn Codec>> {
        match kind {
            MethodKind::Default => self.resolve(MethodKind::DEFAULT_TARGET),
            kind => self.resolve_concrete(kind),
        }
    }

    fn resolve_concrete(&self, kind: MethodKind) -> PersistResult<Arc<dyn Codec>> {
        if !self.is_supported(kind) {
            return Err(PersistenceError::UnsupportedMethod(kind));
        }

        loop {
            let slot = self.slot(kind);
            // Held across construction: racing resolutions of the same kind wait
            // here and then observe the first one's instance.
            let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);

            // A reset or re-registration may have detached this slot while we
            // waited; fetch the current one instead.
            if !self.is_attached(kind, &slot) {
                continue;
            }
            if let Some(codec) = cached.as_ref() {
                return Ok(Arc::clone(codec));
            }

            let codec = self.construct(kind)?;
            log::debug!("Constructed codec for method {kind}.");
            *cached = Some(Arc::clone(&codec));
            return Ok(codec);
        }
    }

    fn slot(&self, kind: MethodKind) -> Slot {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
        {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(kind).or_default())
    }

    fn is_attached(&self, kind: MethodKind, slot: &Slot) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    // Copies the slot handles out so no slot mutex is ever taken while the map
    // lock is held.
    fn slot_snapshot(&self) -> Vec<(MethodKind, Slot)> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(kind, slot)| (*kind, Arc::clone(slot)))
            .collect()
    }

    fn construct(&self, kind: MethodKind) -> PersistResult<Arc<dyn Codec>> {
        let codec: Arc<dyn Codec> = match kind {
            MethodKind::Binary => Arc::new(BinaryCodec::new()),
            MethodKind::Json => Arc::new(JsonCodec::new()),
            #[cfg(feature = "ron")]
            MethodKind::Ron => Arc::new(coffer_codecs::RonCodec::new()),
            MethodKind::BinaryEncrypted => Arc::new(EncryptedCodec::new(
                kind,
                Box::new(BinaryCodec::new()),
                &self.encryption_key,
                &self.encryption_salt,
            )?),
            MethodKind::JsonEncrypted => Arc::new(EncryptedCodec::new(
                kind,
                Box::new(JsonCodec::new()),
                &self.encryption_key,
                &self.encryption_salt,
            )?),
            MethodKind::Custom(id) => {
                let factory = self
                    .custom
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(&id)
                    .cloned()
                    .ok_or(PersistenceError::UnsupportedMethod(kind))?;
                factory()?
            }
            #[allow(unreachable_patterns)]
            other => return Err(PersistenceError::UnsupportedMethod(other)),
        };
        Ok(codec)
    }

    /// Returns `true` if this registry can construct a codec for `kind`.
    pub fn is_supported(&self, kind: MethodKind) -> bool {
        match kind.resolve_alias() {
            MethodKind::Binary
            | MethodKind::Json
            | MethodKind::BinaryEncrypted
            | MethodKind::JsonEncrypted => true,
            MethodKind::Ron => cfg!(feature = "ron"),
            MethodKind::Custom(id) => self
                .custom
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(&id),
            MethodKind::Default => false,
        }
    }

    /// Registers the factory for `MethodKind::Custom(id)` and returns that kind.
    ///
    /// Registering the same id again replaces the factory and drops any codec
    /// already built from the old one. Factories survive [`reset`](Self::reset).
    pub fn register_custom<F>(&self, id: u32, factory: F) -> MethodKind
    where
        F: Fn() -> PersistResult<Arc<dyn Codec>> + Send + Sync + 'static,
    {
        let kind = MethodKind::Custom(id);
        self.custom
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(factory));
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
        log::debug!("Registered factory for method {kind}.");
        kind
    }

    /// Discards every cached codec. Custom factories are kept.
    ///
    /// A resolution already constructing a codec when the reset happens still
    /// returns that instance to its caller, but the instance is not cached;
    /// every resolution that starts after the reset gets a fresh one.
    pub fn reset(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let discarded = slots.len();
        slots.clear();
        log::info!("Method registry reset, {discarded} codec slot(s) discarded.");
    }

    /// Returns `true` if a codec for `kind` has been constructed and cached.
    ///
    /// A codec still under construction counts as not cached.
    pub fn is_cached(&self, kind: MethodKind) -> bool {
        let kind = kind.resolve_alias();
        self.slot_snapshot()
            .into_iter()
            .any(|(cached_kind, slot)| cached_kind == kind && slot_is_filled(&slot))
    }

    /// The kinds that currently have a cached codec, in no particular order.
    pub fn cached_kinds(&self) -> Vec<MethodKind> {
        self.slot_snapshot()
            .into_iter()
            .filter(|(_, slot)| slot_is_filled(slot))
            .map(|(kind, _)| kind)
            .collect()
    }

    /// The number of cached codecs.
    pub fn cached_len(&self) -> usize {
        self.cached_kinds().len()
    }
}

// Never waits: a slot locked by an ongoing construction reads as empty.
fn slot_is_filled(slot: &Slot) -> bool {
    match slot.try_lock() {
        Ok(cached) => cached.is_some(),
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
        Err(TryLockError::WouldBlock) => false,
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("cached", &self.cached_kinds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_resolution_returns_the_same_instance() {
        let registry = MethodRegistry::new("", "");
        let first = registry.resolve(MethodKind::Binary).unwrap();
        let second = registry.resolve(MethodKind::Binary).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.cached_len(), 1);
    }

    #[test]
    fn default_aliases_json_and_is_never_cached_itself() {
        let registry = MethodRegistry::new("", "");
        let via_default = registry.resolve(MethodKind::Default).unwrap();
        let via_json = registry.resolve(MethodKind::Json).unwrap();

        assert!(Arc::ptr_eq(&via_default, &via_json));
        assert_eq!(via_default.kind(), MethodKind::Json);
        assert_eq!(registry.cached_kinds(), vec![MethodKind::Json]);
    }

    #[test]
    fn empty_key_fails_at_first_resolution_and_caches_nothing() {
        let registry = MethodRegistry::new("", "salt");
        for kind in [MethodKind::BinaryEncrypted, MethodKind::JsonEncrypted] {
            let err = registry.resolve(kind).err();
            assert!(matches!(err, Some(PersistenceError::Configuration { .. })));
            assert!(!registry.is_cached(kind));
        }
    }

    #[test]
    fn encrypted_kinds_wrap_the_matching_family() {
        let registry = MethodRegistry::new("key", "salt");
        let codec = registry.resolve(MethodKind::BinaryEncrypted).unwrap();
        assert_eq!(codec.kind(), MethodKind::BinaryEncrypted);
        assert!(registry.is_cached(MethodKind::BinaryEncrypted));
        assert!(!registry.is_cached(MethodKind::Binary));
    }

    #[test]
    fn reset_rebuilds_instances() {
        let registry = MethodRegistry::new("key", "salt");
        let before = registry.resolve(MethodKind::JsonEncrypted).unwrap();

        registry.reset();
        assert_eq!(registry.cached_len(), 0);

        let after = registry.resolve(MethodKind::JsonEncrypted).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn resolver_waiting_across_reset_uses_the_fresh_slot() {
        let registry = MethodRegistry::new("", "");
        let stale = registry.slot(MethodKind::Binary);
        let guard = stale.lock().unwrap();

        std::thread::scope(|scope| {
            let waiting = scope.spawn(|| registry.resolve(MethodKind::Binary).unwrap());
            std::thread::sleep(std::time::Duration::from_millis(100));
            registry.reset();
            drop(guard);

            let resolved = waiting.join().unwrap();
            let current = registry.resolve(MethodKind::Binary).unwrap();
            assert!(Arc::ptr_eq(&resolved, &current));
        });

        assert!(!registry.is_attached(MethodKind::Binary, &stale));
        assert!(stale.lock().unwrap().is_none());
        assert_eq!(registry.cached_kinds(), vec![MethodKind::Binary]);
    }

    #[test]
    fn slot_under_construction_reads_as_not_cached() {
        let registry = MethodRegistry::new("", "");
        let slot = registry.slot(MethodKind::Json);
        let _building = slot.lock().unwrap();

        assert!(!registry.is_cached(MethodKind::Json));
        assert_eq!(registry.cached_len(), 0);
        assert!(format!("{registry:?}").contains("MethodRegistry"));
    }

    #[test]
    fn unregistered_custom_kind_is_unsupported() {
        let registry = MethodRegistry::new("", "");
        let err = registry.resolve(MethodKind::Custom(42)).err();
        assert!(matches!(
            err,
            Some(PersistenceError::UnsupportedMethod(MethodKind::Custom(42)))
        ));
        assert_eq!(registry.cached_len(), 0);
    }

    #[test]
    fn custom_factories_survive_reset() {
        let registry = MethodRegistry::new("", "");
        let kind =
            registry.register_custom(7, || Ok(Arc::new(BinaryCodec::new()) as Arc<dyn Codec>));

        let first = registry.resolve(kind).unwrap();
        registry.reset();
        let second = registry.resolve(kind).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(registry.is_supported(kind));
    }

    #[test]
    fn ron_support_follows_the_feature() {
        let registry = MethodRegistry::new("", "");
        let result = registry.resolve(MethodKind::Ron);
        if cfg!(feature = "ron") {
            assert_eq!(result.unwrap().kind(), MethodKind::Ron);
        } else {
            assert!(matches!(
                result,
                Err(PersistenceError::UnsupportedMethod(MethodKind::Ron))
            ));
        }
    }
}
