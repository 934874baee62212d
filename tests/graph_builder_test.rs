//! Dependency tree shapes over the demo domain.

use deep_automock::AutoMocker;
use deep_automock::demo::{self, ApplicationCore, DataHandler, SystemOrchestrator};
use deep_automock::domain::builder::DependencyGraphBuilder;
use deep_automock::domain::cache::ReflectionCache;
use deep_automock::domain::policy::Strategy;
use deep_automock::{ResolveError, TypeDescriptor};

#[test]
fn test_application_core_tree() {
    let mocker = AutoMocker::new(demo::demo_registry());
    let tree = mocker.build_tree::<ApplicationCore>().unwrap();

    let entries = tree.preorder();
    let shape: Vec<(usize, Strategy)> = entries.iter().map(|e| (e.depth, e.strategy)).collect();
    assert_eq!(
        shape,
        vec![
            (0, Strategy::Composite),
            (1, Strategy::LeafInterface),
            (1, Strategy::LeafInterface),
            (1, Strategy::LeafEmptyConstructible),
            (1, Strategy::Composite),
            (2, Strategy::LeafEmptyConstructible),
            (1, Strategy::LeafPrimitive),
            (1, Strategy::LeafEmptyConstructible),
        ]
    );
    assert_eq!(entries[4].type_name, TypeDescriptor::of::<DataHandler>().name());
    assert_eq!(tree.node_count(), 8);
    assert_eq!(tree.depth(), 2);
    assert!(tree.root_node().is_root);
    assert!(entries[1..].iter().all(|e| e.depth > 0));
}

#[test]
fn test_system_orchestrator_tree_lists_parameters_in_order() {
    let mocker = AutoMocker::new(demo::demo_registry());
    let tree = mocker.build_tree::<SystemOrchestrator>().unwrap();
    let children: Vec<_> = tree
        .children(tree.root())
        .map(|n| n.descriptor)
        .collect();
    assert_eq!(children.len(), 7);
    assert_eq!(children[0], TypeDescriptor::of::<dyn demo::IDataProcessor>());
    assert_eq!(children[5], TypeDescriptor::of::<DataHandler>());
    // SystemOrchestrator, 7 parameters, DataHandler's Vec<String>
    assert_eq!(tree.node_count(), 9);
}

#[test]
fn test_ceiling_is_configurable() {
    let registry = demo::demo_registry();
    let cache = ReflectionCache::new();
    let root = TypeDescriptor::of::<SystemOrchestrator>();

    assert!(DependencyGraphBuilder::new(&registry, &cache).with_max_nodes(9).build(root).is_ok());
    assert_eq!(
        DependencyGraphBuilder::new(&registry, &cache)
            .with_max_nodes(8)
            .build(root)
            .unwrap_err(),
        ResolveError::GraphTooLarge {
            root: root.name().to_string(),
            limit: 8,
        }
    );
}

#[test]
fn test_dot_export() {
    let mocker = AutoMocker::new(demo::demo_registry());
    let dot = mocker.build_tree::<ApplicationCore>().unwrap().to_dot();
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("ApplicationCore"));
    assert!(dot.contains("leaf-primitive"));
}

#[test]
fn test_fresh_caches_build_identical_trees() {
    let registry = demo::demo_registry();
    let root = TypeDescriptor::of::<SystemOrchestrator>();

    let first_cache = ReflectionCache::new();
    let second_cache = ReflectionCache::new();
    let first = DependencyGraphBuilder::new(&registry, &first_cache).build(root).unwrap();
    let second = DependencyGraphBuilder::new(&registry, &second_cache).build(root).unwrap();

    assert_eq!(first.preorder(), second.preorder());
    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.to_dot(), second.to_dot());
}

#[test]
fn test_deep_cycle_with_huge_ceiling_reports_too_large() {
    let registry = demo::demo_registry();
    let cache = ReflectionCache::new();
    let err = DependencyGraphBuilder::new(&registry, &cache)
        .with_max_nodes(250_000)
        .build(TypeDescriptor::of::<demo::CyclicA>())
        .unwrap_err();
    assert!(matches!(err, ResolveError::GraphTooLarge { limit: 250_000, .. }));
}
