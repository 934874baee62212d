use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::domain::policy::Strategy;
use crate::domain::ports::{ConstructionObserver, ConstructionStep};
use crate::domain::type_registry::TypeDescriptor;
use crate::symbol::TypeSymbol;

#[derive(Default)]
struct ScriptState {
    lines: Vec<String>,
    bindings: HashMap<TypeDescriptor, String>,
    taken: HashSet<String>,
}

impl ScriptState {
    fn bind(&mut self, descriptor: TypeDescriptor, base: String) -> String {
        let mut name = base.clone();
        let mut n = 2;
        while self.taken.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        self.taken.insert(name.clone());
        self.bindings.insert(descriptor, name.clone());
        name
    }

    fn argument(&self, descriptor: &TypeDescriptor) -> String {
        self.bindings
            .get(descriptor)
            .cloned()
            .unwrap_or_else(|| "Default::default()".to_string())
    }
}

/// Accumulates copy-pasteable setup statements, one per constructed node, in order.
#[derive(Default)]
pub struct FixtureScript {
    state: Mutex<ScriptState>,
}

impl FixtureScript {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn lines(&self) -> Vec<String> {
        self.state().lines.clone()
    }

    pub fn render(&self) -> String {
        let mut out = self.lines().join("\n");
        out.push('\n');
        out
    }

    pub fn clear(&self) {
        *self.state() = ScriptState::default();
    }
}

impl ConstructionObserver for FixtureScript {
    fn on_step(&self, step: &ConstructionStep) {
        let symbol = TypeSymbol::parse(step.descriptor.name());
        let mut state = self.state();

        let line = match step.strategy {
            Strategy::LeafInterface => {
                let var = state.bind(step.descriptor, format!("{}_mock", symbol.variable_name()));
                format!("let {} = MockControl::new(); // {}", var, symbol.short_name())
            }
            _ if step.absent => {
                let var = state.bind(step.descriptor, symbol.variable_name());
                format!("let {}: Option<{}> = None;", var, symbol.short_name())
            }
            Strategy::LeafPrimitive => {
                let var = state.bind(step.descriptor, symbol.variable_name());
                format!("let {}: {} = Default::default();", var, symbol.short_name())
            }
            Strategy::LeafEmptyConstructible => {
                let var = state.bind(step.descriptor, symbol.variable_name());
                format!("let {} = {}::new();", var, symbol.expression_name())
            }
            Strategy::LeafPrimitiveConstructible | Strategy::Composite => {
                // Leaf arguments of a primitive-constructible type are never bound.
                let args: Vec<String> = step
                    .arguments
                    .iter()
                    .map(|a| {
                        if step.strategy == Strategy::Composite {
                            state.argument(a)
                        } else {
                            "Default::default()".to_string()
                        }
                    })
                    .collect();
                let var = state.bind(step.descriptor, symbol.variable_name());
                format!(
                    "let {} = {}::new({});",
                    var,
                    symbol.expression_name(),
                    args.join(", ")
                )
            }
        };
        state.lines.push(line);
    }
}
