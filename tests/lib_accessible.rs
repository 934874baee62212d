//! Sanity check: library and test common module are accessible.

mod common;

use deep_automock::domain::cache::ReflectionCache;
use deep_automock::{ResolverConfig, TypeRegistry};

#[test]
fn test_library_accessible() {
    assert!(TypeRegistry::new().is_empty());
    assert!(ReflectionCache::new().is_empty());
    assert_eq!(ResolverConfig::default().max_nodes, 100);
}

#[test]
fn test_fixture_registry() {
    let registry = common::fixtures::registry();
    assert!(registry.len() > 20);
}

#[test]
fn test_recording_observer() {
    use common::mock::RecordingObserver;
    use deep_automock::domain::policy::Strategy;
    use deep_automock::domain::ports::{ConstructionObserver, ConstructionStep};

    let observer = RecordingObserver::default();
    observer.on_step(&ConstructionStep {
        descriptor: deep_automock::TypeDescriptor::of::<u8>(),
        strategy: Strategy::LeafPrimitive,
        mocked: false,
        absent: false,
        arguments: Vec::new(),
    });
    assert_eq!(observer.steps().len(), 1);
}
