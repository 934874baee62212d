//! Mock collaborators for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use deep_automock::domain::mock::{DefaultValue, MockControl};
use deep_automock::domain::ports::{
    ConstructionObserver, ConstructionStep, MockBlueprint, MockProvider, SynthesizedMock,
};

/// Mock provider that always fails.
pub struct FailingMockProvider;

impl MockProvider for FailingMockProvider {
    fn create_mock(&self, blueprint: &MockBlueprint, _: DefaultValue) -> Result<SynthesizedMock> {
        Err(anyhow!("no mocking backend for {}", blueprint.interface))
    }
}

/// Mock provider that returns a control handle but no implementation.
pub struct HalfMockProvider;

impl MockProvider for HalfMockProvider {
    fn create_mock(&self, _: &MockBlueprint, default_value: DefaultValue) -> Result<SynthesizedMock> {
        Ok(SynthesizedMock {
            implementation: None,
            control: Some(MockControl::with_default_value(default_value)),
        })
    }
}

/// Counts mock requests, then delegates to the blueprint's proxy.
#[derive(Default)]
pub struct CountingMockProvider {
    pub requests: AtomicUsize,
}

impl CountingMockProvider {
    pub fn count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl MockProvider for CountingMockProvider {
    fn create_mock(&self, blueprint: &MockBlueprint, default_value: DefaultValue) -> Result<SynthesizedMock> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let proxy = blueprint
            .proxy
            .as_ref()
            .ok_or_else(|| anyhow!("{} has no proxy", blueprint.interface))?;
        let control = MockControl::with_default_value(default_value);
        Ok(SynthesizedMock {
            implementation: Some(proxy(control.clone())?),
            control: Some(control),
        })
    }
}

/// Observer that keeps every step it sees.
#[derive(Default)]
pub struct RecordingObserver {
    steps: Mutex<Vec<ConstructionStep>>,
}

impl RecordingObserver {
    pub fn steps(&self) -> Vec<ConstructionStep> {
        self.steps.lock().unwrap().clone()
    }
}

impl ConstructionObserver for RecordingObserver {
    fn on_step(&self, step: &ConstructionStep) {
        self.steps.lock().unwrap().push(step.clone());
    }
}
