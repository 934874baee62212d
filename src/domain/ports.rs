use crate::domain::mock::{DefaultValue, MockControl};
use crate::domain::policy::Strategy;
use crate::domain::type_registry::{Instance, ProxyFactory, TypeDescriptor, TypeInfo};
use anyhow::Result;

/// Type metadata port (implemented by `TypeRegistry` or any other signature source)
pub trait TypeMetadata: Send + Sync {
    fn type_info(&self, descriptor: &TypeDescriptor) -> Option<&TypeInfo>;
}

/// What the mock provider needs to know about an interface
#[derive(Clone)]
pub struct MockBlueprint {
    pub interface: TypeDescriptor,
    pub proxy: Option<ProxyFactory>,
}

impl std::fmt::Debug for MockBlueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBlueprint")
            .field("interface", &self.interface)
            .field("has_proxy", &self.proxy.is_some())
            .finish()
    }
}

/// Output of the mocking collaborator. Either half may be missing.
#[derive(Default)]
pub struct SynthesizedMock {
    pub implementation: Option<Instance>,
    pub control: Option<MockControl>,
}

/// Mocking collaborator port: produces an implementation plus a separate control handle
pub trait MockProvider: Send + Sync {
    fn create_mock(
        &self,
        blueprint: &MockBlueprint,
        default_value: DefaultValue,
    ) -> Result<SynthesizedMock>;
}

/// One construction step, reported in construction order
#[derive(Debug, Clone)]
pub struct ConstructionStep {
    pub descriptor: TypeDescriptor,
    pub strategy: Strategy,
    pub mocked: bool,
    pub absent: bool,
    /// Constructor argument types, empty for mocks and primitive defaults
    pub arguments: Vec<TypeDescriptor>,
}

/// Purely observational hook invoked after each node is constructed
pub trait ConstructionObserver: Send + Sync {
    fn on_step(&self, step: &ConstructionStep);
}
