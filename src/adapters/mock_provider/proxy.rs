use crate::domain::mock::{DefaultValue, MockControl};
use crate::domain::ports::{MockBlueprint, MockProvider, SynthesizedMock};
use anyhow::{Context as _, Result, anyhow};

/// Mock provider backed by the proxy factories registered with each interface.
///
/// The control handle is created first and handed to the factory, so every call on
/// the implementation lands on the same control the test later receives.
#[derive(Debug, Default)]
pub struct ProxyMockProvider;

impl ProxyMockProvider {
    pub fn new() -> Self {
        Self
    }
}

impl MockProvider for ProxyMockProvider {
    fn create_mock(
        &self,
        blueprint: &MockBlueprint,
        default_value: DefaultValue,
    ) -> Result<SynthesizedMock> {
        let proxy = blueprint
            .proxy
            .as_ref()
            .ok_or_else(|| anyhow!("no proxy factory registered for {}", blueprint.interface))?;

        let control = MockControl::with_default_value(default_value);
        let implementation = proxy(control.clone())
            .with_context(|| format!("proxy factory for {} failed", blueprint.interface))?;

        Ok(SynthesizedMock {
            implementation: Some(implementation),
            control: Some(control),
        })
    }
}
