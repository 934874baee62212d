use crate::domain::cache::ReflectionCache;
use crate::domain::error::{ResolveError, ResolveResult};
use crate::domain::graph::DependencyTree;
use crate::domain::node::DependencyNode;
use crate::domain::policy::{Strategy, classify};
use crate::domain::ports::TypeMetadata;
use crate::domain::type_registry::TypeDescriptor;
use petgraph::graph::NodeIndex;
use tracing::{debug, trace};

/// Default node-count ceiling of a single build
pub const DEFAULT_MAX_NODES: usize = 100;

/// Graph builder - walks constructor signatures into a `DependencyTree`
pub struct DependencyGraphBuilder<'a> {
    metadata: &'a dyn TypeMetadata,
    cache: &'a ReflectionCache,
    max_nodes: usize,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(metadata: &'a dyn TypeMetadata, cache: &'a ReflectionCache) -> Self {
        Self {
            metadata,
            cache,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Build the tree rooted at `root`.
    ///
    /// The root is classified like any other type: a leaf-classified root (for
    /// example one whose constructor takes only value types) is a single leaf node
    /// constructed directly. A root without any discoverable constructor becomes a
    /// single leaf node instead of failing here. Leaves are never expanded.
    pub fn build(&self, root: TypeDescriptor) -> ResolveResult<DependencyTree> {
        debug!(root = root.name(), max_nodes = self.max_nodes, "building dependency tree");
        let mut tree = DependencyTree::new();

        let strategy = classify(self.metadata, &root);
        if strategy.is_leaf() {
            self.allocate(&mut tree, DependencyNode::leaf(root, strategy, true), &root)?;
        } else {
            match self.cache.constructor_parameters(self.metadata, &root) {
                Ok(_) => {
                    self.build_composite(&mut tree, root, true, &root)?;
                }
                Err(ResolveError::NoConstructorFound { .. }) => {
                    trace!(root = root.name(), "root has no constructor, treating as leaf");
                    self.allocate(
                        &mut tree,
                        DependencyNode::leaf(root, Strategy::Composite, true),
                        &root,
                    )?;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            root = root.name(),
            nodes = tree.node_count(),
            "dependency tree built"
        );
        Ok(tree)
    }

    /// Explicit-stack walk; children are appended in parameter order, so node
    /// allocation order matches a recursive pre-order walk.
    fn build_composite(
        &self,
        tree: &mut DependencyTree,
        descriptor: TypeDescriptor,
        is_root: bool,
        root: &TypeDescriptor,
    ) -> ResolveResult<NodeIndex> {
        let top = self.allocate(tree, DependencyNode::composite(descriptor, is_root), root)?;
        let params = self.cache.constructor_parameters(self.metadata, &descriptor)?;
        let mut stack = vec![(top, params, 0usize)];

        while let Some((parent, params, next)) = stack.last_mut() {
            let Some(param) = params.get(*next).copied() else {
                stack.pop();
                continue;
            };
            *next += 1;
            let parent = *parent;

            let strategy = classify(self.metadata, &param);
            if strategy.is_leaf() {
                let child = self.allocate(tree, DependencyNode::leaf(param, strategy, false), root)?;
                tree.add_child(parent, child);
            } else {
                let child = self.allocate(tree, DependencyNode::composite(param, false), root)?;
                tree.add_child(parent, child);
                let params = self.cache.constructor_parameters(self.metadata, &param)?;
                stack.push((child, params, 0));
            }
        }
        Ok(top)
    }

    fn allocate(
        &self,
        tree: &mut DependencyTree,
        node: DependencyNode,
        root: &TypeDescriptor,
    ) -> ResolveResult<NodeIndex> {
        if tree.node_count() >= self.max_nodes {
            return Err(ResolveError::GraphTooLarge {
                root: root.name().to_string(),
                limit: self.max_nodes,
            });
        }
        trace!(
            type_name = node.descriptor.name(),
            strategy = node.strategy.label(),
            "tree node"
        );
        Ok(tree.add_node(node))
    }
}
