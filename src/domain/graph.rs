use crate::domain::node::DependencyNode;
use crate::domain::policy::Strategy;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

/// Dependency tree - the result of walking constructor signatures from a root type.
///
/// Edges point parent → child and carry the constructor parameter position. A type
/// reachable through several paths appears once per path.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    pub graph: DiGraph<DependencyNode, usize>,
    root: NodeIndex,
}

/// One entry of a pre-order walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub depth: usize,
    pub type_name: &'static str,
    pub strategy: Strategy,
    pub is_leaf: bool,
}

impl DependencyTree {
    pub(crate) fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            root: NodeIndex::new(0),
        }
    }

    pub(crate) fn add_node(&mut self, node: DependencyNode) -> NodeIndex {
        let is_root = node.is_root;
        let idx = self.graph.add_node(node);
        if is_root {
            self.root = idx;
        }
        idx
    }

    pub(crate) fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let position = self.graph[parent].children.len();
        self.graph[parent].children.push(child);
        self.graph.add_edge(parent, child, position);
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, idx: NodeIndex) -> &DependencyNode {
        &self.graph[idx]
    }

    pub fn root_node(&self) -> &DependencyNode {
        self.node(self.root)
    }

    pub fn children(&self, idx: NodeIndex) -> impl Iterator<Item = &DependencyNode> {
        self.graph[idx].children.iter().map(move |&c| &self.graph[c])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Depth-first pre-order walk honouring parameter order
    pub fn preorder(&self) -> Vec<TreeEntry> {
        let mut entries = Vec::with_capacity(self.node_count());
        let mut stack = vec![(self.root, 0)];
        while let Some((idx, depth)) = stack.pop() {
            let node = &self.graph[idx];
            entries.push(TreeEntry {
                depth,
                type_name: node.descriptor.name(),
                strategy: node.strategy,
                is_leaf: node.is_leaf,
            });
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        entries
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        self.preorder().iter().map(|e| e.depth).max().unwrap_or(0)
    }

    /// Graphviz rendering, node labels are type names
    pub fn to_dot(&self) -> String {
        let labelled = self.graph.map(
            |_, n| format!("{} ({})", n.descriptor.name(), n.strategy.label()),
            |_, position| *position,
        );
        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }
}
