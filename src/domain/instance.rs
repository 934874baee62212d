use std::sync::Arc;

use crate::domain::cache::ReflectionCache;
use crate::domain::error::{ResolveError, ResolveResult};
use crate::domain::graph::DependencyTree;
use crate::domain::node::DependencyNode;
use crate::domain::policy::Strategy;
use crate::domain::ports::{ConstructionObserver, ConstructionStep, TypeMetadata};
use crate::domain::result::{ConstructionRecord, ConstructionResult};
use crate::domain::synthesizer::{MockSynthesizer, invoke};
use crate::domain::type_registry::{Instance, TypeDescriptor};
use petgraph::graph::NodeIndex;
use tracing::trace;

/// Instance builder - turns a dependency tree into live instances, children first.
///
/// Every type is resolved at most once per result: a type met again on another
/// path reuses the recorded implementation, so shared dependencies are shared.
pub struct InstanceBuilder<'a> {
    metadata: &'a dyn TypeMetadata,
    cache: &'a ReflectionCache,
    synthesizer: MockSynthesizer<'a>,
    observers: &'a [Arc<dyn ConstructionObserver>],
}

impl<'a> InstanceBuilder<'a> {
    pub fn new(
        metadata: &'a dyn TypeMetadata,
        cache: &'a ReflectionCache,
        synthesizer: MockSynthesizer<'a>,
        observers: &'a [Arc<dyn ConstructionObserver>],
    ) -> Self {
        Self {
            metadata,
            cache,
            synthesizer,
            observers,
        }
    }

    /// Resolve the whole tree into `result` and return the root's record.
    pub fn instantiate(
        &self,
        tree: &DependencyTree,
        result: &mut ConstructionResult,
    ) -> ResolveResult<ConstructionRecord> {
        self.resolve(tree, result)?;
        let root = tree.root_node().descriptor;
        result
            .record(&root)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                type_name: root.name().to_string(),
            })
    }

    /// Post-order walk on an explicit stack. Each frame collects its children's
    /// values in parameter order; a finished frame hands its value to its parent.
    fn resolve(&self, tree: &DependencyTree, result: &mut ConstructionResult) -> ResolveResult<()> {
        let mut stack = vec![Frame::new(tree.root())];

        while let Some(frame) = stack.last_mut() {
            let node = tree.node(frame.idx);

            let mut finished = None;
            if !frame.entered {
                frame.entered = true;
                if let Some(existing) = result.record(&node.descriptor) {
                    trace!(type_name = node.descriptor.name(), "reusing resolved dependency");
                    finished = Some(existing.implementation.clone());
                } else if node.is_leaf {
                    finished = Some(self.synthesize_leaf(node, result)?);
                }
            }

            let value = match finished {
                Some(value) => value,
                None => {
                    if let Some(&child) = node.children.get(frame.next) {
                        frame.next += 1;
                        stack.push(Frame::new(child));
                        continue;
                    }
                    let values = std::mem::take(&mut frame.values);
                    Some(self.construct(node, values, result)?)
                }
            };

            stack.pop();
            if let Some(parent) = stack.last_mut() {
                parent.values.push(value);
            }
        }
        Ok(())
    }

    fn synthesize_leaf(
        &self,
        node: &DependencyNode,
        result: &mut ConstructionResult,
    ) -> ResolveResult<Option<Instance>> {
        let record = self.synthesizer.synthesize(node.descriptor, node.strategy)?;
        self.notify(&ConstructionStep {
            descriptor: record.descriptor,
            strategy: record.strategy,
            mocked: record.is_mocked(),
            absent: record.implementation.is_none(),
            arguments: self.leaf_arguments(&record),
        });
        let implementation = record.implementation.clone();
        result.insert(record);
        Ok(implementation)
    }

    fn construct(
        &self,
        node: &DependencyNode,
        values: Vec<Option<Instance>>,
        result: &mut ConstructionResult,
    ) -> ResolveResult<Instance> {
        let preferred = self
            .cache
            .preferred_constructor(self.metadata, &node.descriptor)?;
        let instance = invoke(&node.descriptor, &preferred.constructor, values)?;
        trace!(type_name = node.descriptor.name(), "constructed");

        self.notify(&ConstructionStep {
            descriptor: node.descriptor,
            strategy: Strategy::Composite,
            mocked: false,
            absent: false,
            arguments: preferred.constructor.params.to_vec(),
        });
        result.insert(ConstructionRecord {
            descriptor: node.descriptor,
            strategy: Strategy::Composite,
            implementation: Some(instance.clone()),
            control: None,
        });
        Ok(instance)
    }

    fn leaf_arguments(&self, record: &ConstructionRecord) -> Vec<TypeDescriptor> {
        if record.strategy != Strategy::LeafPrimitiveConstructible {
            return Vec::new();
        }
        self.synthesizer
            .primitive_constructor(&record.descriptor)
            .map(|c| c.params.to_vec())
            .unwrap_or_default()
    }

    fn notify(&self, step: &ConstructionStep) {
        for observer in self.observers {
            observer.on_step(step);
        }
    }
}

struct Frame {
    idx: NodeIndex,
    entered: bool,
    next: usize,
    values: Vec<Option<Instance>>,
}

impl Frame {
    fn new(idx: NodeIndex) -> Self {
        Self {
            idx,
            entered: false,
            next: 0,
            values: Vec::new(),
        }
    }
}
