use crate::domain::cache::ReflectionCache;
use crate::domain::error::{ResolveError, ResolveResult};
use crate::domain::mock::{DefaultValue, MockControl};
use crate::domain::policy::{Strategy, primitive_constructor_index};
use crate::domain::ports::{MockProvider, TypeMetadata};
use crate::domain::result::ConstructionRecord;
use crate::domain::type_registry::{Args, ConstructorInfo, Instance, TypeDescriptor};
use tracing::trace;

/// Resolves leaf nodes: default values, mocks, and trivially constructible classes
pub struct MockSynthesizer<'a> {
    metadata: &'a dyn TypeMetadata,
    cache: &'a ReflectionCache,
    provider: &'a dyn MockProvider,
    default_value: DefaultValue,
}

impl<'a> MockSynthesizer<'a> {
    pub fn new(
        metadata: &'a dyn TypeMetadata,
        cache: &'a ReflectionCache,
        provider: &'a dyn MockProvider,
        default_value: DefaultValue,
    ) -> Self {
        Self {
            metadata,
            cache,
            provider,
            default_value,
        }
    }

    pub fn synthesize(
        &self,
        descriptor: TypeDescriptor,
        strategy: Strategy,
    ) -> ResolveResult<ConstructionRecord> {
        trace!(type_name = descriptor.name(), strategy = strategy.label(), "synthesizing leaf");
        let record = |implementation, control| ConstructionRecord {
            descriptor,
            strategy,
            implementation,
            control,
        };

        match strategy {
            Strategy::LeafPrimitive => Ok(record(self.default_of(&descriptor), None)),
            Strategy::LeafInterface => {
                let (implementation, control) = self.mock_interface(&descriptor)?;
                Ok(record(Some(implementation), Some(control)))
            }
            Strategy::LeafEmptyConstructible => {
                let preferred = self.cache.preferred_constructor(self.metadata, &descriptor)?;
                let instance = invoke(&descriptor, &preferred.constructor, Vec::new())?;
                Ok(record(Some(instance), None))
            }
            Strategy::LeafPrimitiveConstructible => {
                let constructor = self.primitive_constructor(&descriptor)?;
                let args = constructor
                    .params
                    .iter()
                    .map(|p| self.default_of(p))
                    .collect();
                let instance = invoke(&descriptor, &constructor, args)?;
                Ok(record(Some(instance), None))
            }
            // Only a constructor-less root ends up here; nothing is known about it.
            Strategy::Composite => Ok(record(None, None)),
        }
    }

    /// Classifier default of a value type; `None` when nothing is known about it
    pub fn default_of(&self, descriptor: &TypeDescriptor) -> Option<Instance> {
        self.metadata
            .type_info(descriptor)
            .and_then(|info| info.default_value.as_ref())
            .map(|make| make())
    }

    fn mock_interface(
        &self,
        descriptor: &TypeDescriptor,
    ) -> ResolveResult<(Instance, MockControl)> {
        let failed = |reason: String| ResolveError::SynthesisFailed {
            type_name: descriptor.name().to_string(),
            reason,
        };

        let blueprint = self.cache.mock_blueprint(self.metadata, descriptor);
        let mock = self
            .provider
            .create_mock(&blueprint, self.default_value)
            .map_err(|e| failed(format!("{:#}", e)))?;

        match (mock.implementation, mock.control) {
            (Some(implementation), Some(control)) => Ok((implementation, control)),
            (None, _) => Err(failed("mock provider returned no implementation".into())),
            (_, None) => Err(failed("mock provider returned no control handle".into())),
        }
    }

    pub(crate) fn primitive_constructor(&self, descriptor: &TypeDescriptor) -> ResolveResult<ConstructorInfo> {
        primitive_constructor_index(self.metadata, descriptor)
            .and_then(|index| {
                self.metadata
                    .type_info(descriptor)
                    .and_then(|info| info.constructors.get(index))
                    .cloned()
            })
            .ok_or_else(|| ResolveError::NoConstructorFound {
                type_name: descriptor.name().to_string(),
            })
    }
}

/// Invoke a constructor, folding its failure into `ConstructionFailed`.
pub(crate) fn invoke(
    descriptor: &TypeDescriptor,
    constructor: &ConstructorInfo,
    values: Vec<Option<Instance>>,
) -> ResolveResult<Instance> {
    let args = Args::new(*descriptor, values);
    constructor
        .invoke(&args)
        .map_err(|e| ResolveError::ConstructionFailed {
            type_name: descriptor.name().to_string(),
            reason: format!("{:#}", e),
        })
}
