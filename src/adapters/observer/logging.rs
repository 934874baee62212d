use crate::domain::ports::{ConstructionObserver, ConstructionStep};
use tracing::debug;

/// Logs every construction step at debug level
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ConstructionObserver for TracingObserver {
    fn on_step(&self, step: &ConstructionStep) {
        debug!(
            type_name = step.descriptor.name(),
            strategy = step.strategy.label(),
            mocked = step.mocked,
            absent = step.absent,
            arguments = step.arguments.len(),
            "construction step"
        );
    }
}
