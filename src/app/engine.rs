use crate::adapters::mock_provider::ProxyMockProvider;
use crate::app::config::ResolverConfig;
use crate::domain::builder::DependencyGraphBuilder;
use crate::domain::cache::ReflectionCache;
use crate::domain::error::ResolveResult;
use crate::domain::graph::DependencyTree;
use crate::domain::instance::InstanceBuilder;
use crate::domain::ports::{ConstructionObserver, MockProvider, TypeMetadata};
use crate::domain::result::ConstructionResult;
use crate::domain::synthesizer::MockSynthesizer;
use crate::domain::type_registry::{TypeDescriptor, TypeRegistry};
use std::sync::Arc;
use tracing::{debug, warn};

/// Auto-mocking resolver: builds a subject with all of its dependencies, mocking
/// interfaces and defaulting values.
///
/// Cheap to clone; clones share the reflection cache. Concurrent resolutions from
/// several threads are supported.
#[derive(Clone)]
pub struct AutoMocker {
    metadata: Arc<dyn TypeMetadata>,
    cache: Arc<ReflectionCache>,
    provider: Arc<dyn MockProvider>,
    observers: Arc<[Arc<dyn ConstructionObserver>]>,
    config: ResolverConfig,
}

impl AutoMocker {
    /// Resolver over `registry` with the default mock provider, a private cache and
    /// default configuration.
    pub fn new(registry: TypeRegistry) -> Self {
        Self::builder(Arc::new(registry)).build()
    }

    pub fn builder(metadata: Arc<dyn TypeMetadata>) -> AutoMockerBuilder {
        AutoMockerBuilder {
            metadata,
            cache: None,
            provider: None,
            observers: Vec::new(),
            config: ResolverConfig::default(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ReflectionCache> {
        &self.cache
    }

    pub fn metadata(&self) -> &dyn TypeMetadata {
        self.metadata.as_ref()
    }

    /// Graph-only pass over `T`'s constructor signatures.
    pub fn build_tree<T: ?Sized + 'static>(&self) -> ResolveResult<DependencyTree> {
        self.build_tree_for(TypeDescriptor::of::<T>())
    }

    pub fn build_tree_for(&self, root: TypeDescriptor) -> ResolveResult<DependencyTree> {
        let outcome = self.graph_builder().build(root);
        self.after_failure(&root, outcome)
    }

    /// Build `T` with every dependency resolved.
    pub fn resolve<T: ?Sized + 'static>(&self) -> ResolveResult<ConstructionResult> {
        self.resolve_type(TypeDescriptor::of::<T>())
    }

    pub fn resolve_type(&self, root: TypeDescriptor) -> ResolveResult<ConstructionResult> {
        debug!(subject = root.name(), "resolving");
        let outcome = self.graph_builder().build(root).and_then(|tree| {
            let mut result = ConstructionResult::new(root);
            self.instance_builder().instantiate(&tree, &mut result)?;
            Ok(result)
        });
        let result = self.after_failure(&root, outcome)?;
        debug!(
            subject = root.name(),
            records = result.len(),
            mocked = result.mocked().len(),
            "resolved"
        );
        Ok(result)
    }

    fn graph_builder(&self) -> DependencyGraphBuilder<'_> {
        DependencyGraphBuilder::new(self.metadata.as_ref(), &self.cache)
            .with_max_nodes(self.config.max_nodes)
    }

    fn instance_builder(&self) -> InstanceBuilder<'_> {
        let synthesizer = MockSynthesizer::new(
            self.metadata.as_ref(),
            &self.cache,
            self.provider.as_ref(),
            self.config.default_value,
        );
        InstanceBuilder::new(
            self.metadata.as_ref(),
            &self.cache,
            synthesizer,
            &self.observers,
        )
    }

    /// A failed resolution may have cached partial state; drop all of it.
    fn after_failure<T>(&self, root: &TypeDescriptor, outcome: ResolveResult<T>) -> ResolveResult<T> {
        if let Err(e) = &outcome {
            warn!(subject = root.name(), error = %e, "resolution failed");
            self.cache.clear();
        }
        outcome
    }
}

pub struct AutoMockerBuilder {
    metadata: Arc<dyn TypeMetadata>,
    cache: Option<Arc<ReflectionCache>>,
    provider: Option<Arc<dyn MockProvider>>,
    observers: Vec<Arc<dyn ConstructionObserver>>,
    config: ResolverConfig,
}

impl AutoMockerBuilder {
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a reflection cache with other resolvers over the same metadata.
    pub fn cache(mut self, cache: Arc<ReflectionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn mock_provider(mut self, provider: Arc<dyn MockProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ConstructionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> AutoMocker {
        AutoMocker {
            metadata: self.metadata,
            cache: self.cache.unwrap_or_else(ReflectionCache::shared),
            provider: self
                .provider
                .unwrap_or_else(|| Arc::new(ProxyMockProvider::new())),
            observers: self.observers.into(),
            config: self.config,
        }
    }
}
