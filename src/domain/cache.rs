//! Reflection cache shared by every resolution of a process.
//!
//! Entries are inserted lazily and are idempotent: the same key always maps to an
//! equivalent value, so concurrent population cannot diverge. `clear` is the only
//! destructive operation and is issued by the resolver after any failure.

use std::any::TypeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::{trace, warn};

use crate::domain::error::{ResolveError, ResolveResult};
use crate::domain::policy::select_constructor;
use crate::domain::ports::{MockBlueprint, TypeMetadata};
use crate::domain::type_registry::{ConstructorInfo, TypeDescriptor};

/// Preferred constructor of a type, as selected by the policy
#[derive(Debug, Clone)]
pub struct CachedConstructor {
    pub index: usize,
    pub constructor: ConstructorInfo,
}

#[derive(Debug, Default)]
pub struct ReflectionCache {
    constructors: DashMap<TypeId, Arc<CachedConstructor>>,
    parameters: DashMap<TypeId, Arc<[TypeDescriptor]>>,
    mock_blueprints: DashMap<TypeId, Arc<MockBlueprint>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ReflectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn preferred_constructor(
        &self,
        metadata: &dyn TypeMetadata,
        descriptor: &TypeDescriptor,
    ) -> ResolveResult<Arc<CachedConstructor>> {
        if let Some(cached) = self.constructors.get(&descriptor.id()) {
            self.hit();
            return Ok(cached.value().clone());
        }
        self.miss();

        let index = select_constructor(metadata, descriptor)?;
        let constructor = metadata
            .type_info(descriptor)
            .and_then(|info| info.constructors.get(index))
            .cloned()
            .ok_or_else(|| ResolveError::NoConstructorFound {
                type_name: descriptor.name().to_string(),
            })?;
        trace!(type_name = descriptor.name(), index, "cached preferred constructor");

        // Another caller may have raced us here; keep whichever landed first.
        let entry = self
            .constructors
            .entry(descriptor.id())
            .or_insert_with(|| Arc::new(CachedConstructor { index, constructor }));
        Ok(entry.value().clone())
    }

    /// Ordered parameter types of the preferred constructor
    pub fn constructor_parameters(
        &self,
        metadata: &dyn TypeMetadata,
        descriptor: &TypeDescriptor,
    ) -> ResolveResult<Arc<[TypeDescriptor]>> {
        if let Some(cached) = self.parameters.get(&descriptor.id()) {
            self.hit();
            return Ok(cached.value().clone());
        }
        self.miss();

        let params = self
            .preferred_constructor(metadata, descriptor)?
            .constructor
            .params
            .clone();
        let entry = self
            .parameters
            .entry(descriptor.id())
            .or_insert(params);
        Ok(entry.value().clone())
    }

    /// Mock-implementation mapping of an interface
    pub fn mock_blueprint(
        &self,
        metadata: &dyn TypeMetadata,
        descriptor: &TypeDescriptor,
    ) -> Arc<MockBlueprint> {
        if let Some(cached) = self.mock_blueprints.get(&descriptor.id()) {
            self.hit();
            return cached.value().clone();
        }
        self.miss();

        let blueprint = MockBlueprint {
            interface: *descriptor,
            proxy: metadata
                .type_info(descriptor)
                .and_then(|info| info.proxy.clone()),
        };
        self.mock_blueprints
            .entry(descriptor.id())
            .or_insert_with(|| Arc::new(blueprint))
            .value()
            .clone()
    }

    /// Drop every entry. Concurrent resolutions simply repopulate what they need.
    pub fn clear(&self) {
        warn!(
            constructors = self.constructors.len(),
            parameters = self.parameters.len(),
            mock_blueprints = self.mock_blueprints.len(),
            "clearing reflection cache"
        );
        self.constructors.clear();
        self.parameters.clear();
        self.mock_blueprints.clear();
    }

    /// Number of cached entries across all maps
    pub fn len(&self) -> usize {
        self.constructors.len() + self.parameters.len() + self.mock_blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
