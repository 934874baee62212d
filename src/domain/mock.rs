//! Control handles for synthesized interface implementations.
//!
//! A proxy registered for an interface forwards every call to its `MockControl`,
//! which records the call and answers with whatever the test configured. Tests
//! reach the same control through `ConstructionResult::control_handle`.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// What an unconfigured sequence-returning call yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// Empty collection instead of an absent value
    #[default]
    Empty,
    Absent,
}

#[derive(Default)]
struct ControlState {
    default_value: DefaultValue,
    returns: HashMap<String, Box<dyn Any + Send>>,
    calls: Vec<String>,
}

/// Shared, cloneable control handle. Clones observe the same state.
#[derive(Clone, Default)]
pub struct MockControl {
    state: Arc<Mutex<ControlState>>,
}

impl MockControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_value(default_value: DefaultValue) -> Self {
        let control = Self::new();
        control.set_default_value(default_value);
        control
    }

    fn state(&self) -> MutexGuard<'_, ControlState> {
        // A panicking proxy must not make the handle unusable for later assertions.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn default_value(&self) -> DefaultValue {
        self.state().default_value
    }

    pub fn set_default_value(&self, default_value: DefaultValue) {
        self.state().default_value = default_value;
    }

    /// Configure the value returned by `method`. Later calls overwrite earlier ones.
    pub fn returns<R: Any + Send>(&self, method: &str, value: R) {
        self.state()
            .returns
            .insert(method.to_string(), Box::new(value));
    }

    /// Record a call to `method` and answer with its configured value, if any.
    pub fn invoke<R: Any + Clone>(&self, method: &str) -> Option<R> {
        let mut state = self.state();
        state.calls.push(method.to_string());
        state
            .returns
            .get(method)
            .and_then(|v| v.downcast_ref::<R>())
            .cloned()
    }

    /// Like [`MockControl::invoke`] for sequence-like results: unconfigured calls yield
    /// an empty collection under [`DefaultValue::Empty`].
    pub fn invoke_sequence<R: Any + Clone + Default>(&self, method: &str) -> Option<R> {
        let configured = self.invoke::<R>(method);
        match (configured, self.default_value()) {
            (Some(value), _) => Some(value),
            (None, DefaultValue::Empty) => Some(R::default()),
            (None, DefaultValue::Absent) => None,
        }
    }

    /// Method names in call order
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn times_called(&self, method: &str) -> usize {
        self.state().calls.iter().filter(|c| *c == method).count()
    }

    pub fn verify_called(&self, method: &str, times: usize) -> Result<()> {
        let actual = self.times_called(method);
        if actual != times {
            bail!(
                "expected `{}` to be called {} time(s), was called {} time(s)",
                method,
                times,
                actual
            );
        }
        Ok(())
    }

    /// Forget recorded calls and configured returns; keeps the default-value policy.
    pub fn reset(&self) {
        let mut state = self.state();
        state.calls.clear();
        state.returns.clear();
    }

    pub fn same_as(&self, other: &MockControl) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for MockControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("MockControl")
            .field("default_value", &state.default_value)
            .field("configured", &state.returns.len())
            .field("calls", &state.calls)
            .finish()
    }
}

/// Control handle typed by the interface it drives.
pub struct MockHandle<I: ?Sized> {
    control: MockControl,
    _interface: PhantomData<fn(&I)>,
}

impl<I: ?Sized> MockHandle<I> {
    pub fn new(control: MockControl) -> Self {
        Self {
            control,
            _interface: PhantomData,
        }
    }

    pub fn control(&self) -> &MockControl {
        &self.control
    }

    pub fn into_control(self) -> MockControl {
        self.control
    }
}

impl<I: ?Sized> Clone for MockHandle<I> {
    fn clone(&self) -> Self {
        Self::new(self.control.clone())
    }
}

impl<I: ?Sized> Deref for MockHandle<I> {
    type Target = MockControl;

    fn deref(&self) -> &MockControl {
        &self.control
    }
}

impl<I: ?Sized> fmt::Debug for MockHandle<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHandle")
            .field("interface", &std::any::type_name::<I>())
            .field("control", &self.control)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_return_is_cloned_per_call() {
        let control = MockControl::new();
        control.returns("count", 3_u32);
        assert_eq!(control.invoke::<u32>("count"), Some(3));
        assert_eq!(control.invoke::<u32>("count"), Some(3));
        assert_eq!(control.times_called("count"), 2);
    }

    #[test]
    fn test_unconfigured_sequence_defaults_to_empty() {
        let control = MockControl::new();
        assert_eq!(
            control.invoke_sequence::<Vec<String>>("names"),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_absent_policy_yields_none() {
        let control = MockControl::with_default_value(DefaultValue::Absent);
        assert_eq!(control.invoke_sequence::<Vec<String>>("names"), None);
    }

    #[test]
    fn test_wrong_return_type_is_none() {
        let control = MockControl::new();
        control.returns("name", "x".to_string());
        assert_eq!(control.invoke::<u32>("name"), None);
    }

    #[test]
    fn test_verify_called() {
        let control = MockControl::new();
        control.invoke::<()>("ping");
        assert!(control.verify_called("ping", 1).is_ok());
        assert!(control.verify_called("ping", 2).is_err());
    }

    #[test]
    fn test_clones_share_state_and_reset_clears() {
        let control = MockControl::new();
        let handle: MockHandle<dyn Send> = MockHandle::new(control.clone());
        handle.returns("id", 9_i64);
        assert_eq!(control.invoke::<i64>("id"), Some(9));
        assert!(handle.same_as(&control));

        control.reset();
        assert!(handle.calls().is_empty());
        assert_eq!(handle.invoke::<i64>("id"), None);
    }
}
