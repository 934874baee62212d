//! Serializable reports for trees, resolutions and classifications.

use serde::Serialize;

use crate::domain::graph::DependencyTree;
use crate::domain::policy::{Strategy, classify};
use crate::domain::ports::TypeMetadata;
use crate::domain::result::ConstructionResult;
use crate::domain::type_registry::{TypeDescriptor, TypeKind};
use crate::symbol::TypeSymbol;

#[derive(Debug, Clone, Serialize)]
pub struct TreeNodeDto {
    pub depth: usize,
    pub type_name: String,
    pub short_name: String,
    pub strategy: Strategy,
    pub is_leaf: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    pub root: String,
    pub node_count: usize,
    pub depth: usize,
    /// Pre-order, children in parameter order
    pub nodes: Vec<TreeNodeDto>,
}

impl TreeReport {
    pub fn from_tree(tree: &DependencyTree) -> Self {
        let nodes = tree
            .preorder()
            .into_iter()
            .map(|entry| TreeNodeDto {
                depth: entry.depth,
                short_name: TypeSymbol::parse(entry.type_name).short_name(),
                type_name: entry.type_name.to_string(),
                strategy: entry.strategy,
                is_leaf: entry.is_leaf,
            })
            .collect();
        Self {
            root: tree.root_node().descriptor.name().to_string(),
            node_count: tree.node_count(),
            depth: tree.depth(),
            nodes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordDto {
    pub type_name: String,
    pub short_name: String,
    pub strategy: Strategy,
    pub mocked: bool,
    pub absent: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub subject: String,
    pub record_count: usize,
    pub mocked: Vec<String>,
    /// Construction order
    pub records: Vec<RecordDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Vec<String>>,
}

impl ResolutionReport {
    pub fn from_result(result: &ConstructionResult) -> Self {
        let records = result
            .records()
            .map(|r| RecordDto {
                type_name: r.descriptor.name().to_string(),
                short_name: TypeSymbol::parse(r.descriptor.name()).short_name(),
                strategy: r.strategy,
                mocked: r.is_mocked(),
                absent: r.implementation.is_none(),
            })
            .collect();
        Self {
            subject: result.subject_type().name().to_string(),
            record_count: result.len(),
            mocked: result
                .mocked()
                .iter()
                .map(|d| TypeSymbol::parse(d.name()).short_name())
                .collect(),
            records,
            script: None,
        }
    }

    pub fn with_script(mut self, lines: Vec<String>) -> Self {
        self.script = Some(lines);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationItem {
    pub type_name: String,
    pub short_name: String,
    pub kind: TypeKind,
    pub strategy: Strategy,
    pub constructor_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub items: Vec<ClassificationItem>,
}

impl ClassificationReport {
    /// Classify `descriptors`; types without metadata are skipped.
    pub fn classify_all(metadata: &dyn TypeMetadata, descriptors: &[TypeDescriptor]) -> Self {
        let items = descriptors
            .iter()
            .filter_map(|d| {
                let info = metadata.type_info(d)?;
                Some(ClassificationItem {
                    type_name: d.name().to_string(),
                    short_name: TypeSymbol::parse(d.name()).short_name(),
                    kind: info.kind,
                    strategy: classify(metadata, d),
                    constructor_count: info.constructors.len(),
                })
            })
            .collect();
        Self { items }
    }
}
