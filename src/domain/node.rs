use crate::domain::policy::Strategy;
use crate::domain::type_registry::TypeDescriptor;
use petgraph::graph::NodeIndex;

/// A node of the dependency tree
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub descriptor: TypeDescriptor,
    /// Classification at build time
    pub strategy: Strategy,
    /// Children in constructor-parameter order; empty for leaves
    pub children: Vec<NodeIndex>,
    pub is_leaf: bool,
    /// True only for the first node of a build
    pub is_root: bool,
}

impl DependencyNode {
    pub fn leaf(descriptor: TypeDescriptor, strategy: Strategy, is_root: bool) -> Self {
        Self {
            descriptor,
            strategy,
            children: Vec::new(),
            is_leaf: true,
            is_root,
        }
    }

    pub fn composite(descriptor: TypeDescriptor, is_root: bool) -> Self {
        Self {
            descriptor,
            strategy: Strategy::Composite,
            children: Vec::new(),
            is_leaf: false,
            is_root,
        }
    }
}
