//! Construction records and typed lookup over a finished resolution.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::error::{ResolveError, ResolveResult};
use crate::domain::mock::{MockControl, MockHandle};
use crate::domain::policy::Strategy;
use crate::domain::type_registry::{Instance, TypeDescriptor};

/// How one type was resolved
#[derive(Clone)]
pub struct ConstructionRecord {
    pub descriptor: TypeDescriptor,
    pub strategy: Strategy,
    /// `None` only for value types without a known default
    pub implementation: Option<Instance>,
    /// Present only when the implementation was synthesized as a mock
    pub control: Option<MockControl>,
}

impl ConstructionRecord {
    pub fn is_mocked(&self) -> bool {
        self.control.is_some()
    }
}

impl std::fmt::Debug for ConstructionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructionRecord")
            .field("descriptor", &self.descriptor)
            .field("strategy", &self.strategy)
            .field("absent", &self.implementation.is_none())
            .field("mocked", &self.is_mocked())
            .finish()
    }
}

/// All records of one resolution, at most one per type, plus the subject type.
#[derive(Debug, Clone)]
pub struct ConstructionResult {
    subject: TypeDescriptor,
    records: HashMap<TypeDescriptor, ConstructionRecord>,
    order: Vec<TypeDescriptor>,
}

fn not_found(name: &str) -> ResolveError {
    ResolveError::NotFound {
        type_name: name.to_string(),
    }
}

impl ConstructionResult {
    pub fn new(subject: TypeDescriptor) -> Self {
        Self {
            subject,
            records: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// First record for a type wins; later inserts for the same type are ignored.
    pub(crate) fn insert(&mut self, record: ConstructionRecord) {
        let descriptor = record.descriptor;
        if self.records.contains_key(&descriptor) {
            return;
        }
        self.records.insert(descriptor, record);
        self.order.push(descriptor);
    }

    pub fn subject_type(&self) -> TypeDescriptor {
        self.subject
    }

    pub fn record(&self, descriptor: &TypeDescriptor) -> Option<&ConstructionRecord> {
        self.records.get(descriptor)
    }

    /// Records in construction order (children before parents)
    pub fn records(&self) -> impl Iterator<Item = &ConstructionRecord> {
        self.order.iter().filter_map(|d| self.records.get(d))
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.records.contains_key(&TypeDescriptor::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mocked types in construction order
    pub fn mocked(&self) -> Vec<TypeDescriptor> {
        self.records()
            .filter(|r| r.is_mocked())
            .map(|r| r.descriptor)
            .collect()
    }

    fn implementation(&self, descriptor: &TypeDescriptor) -> ResolveResult<&Instance> {
        self.records
            .get(descriptor)
            .and_then(|r| r.implementation.as_ref())
            .ok_or_else(|| not_found(descriptor.name()))
    }

    /// The subject instance. `T` must be the resolved root type.
    pub fn subject<T: Any + Send + Sync>(&self) -> ResolveResult<Arc<T>> {
        if TypeDescriptor::of::<T>() != self.subject {
            return Err(not_found(std::any::type_name::<T>()));
        }
        self.get::<T>()
    }

    /// The subject when the root type is itself an interface.
    pub fn subject_service<I: ?Sized + Send + Sync + 'static>(&self) -> ResolveResult<Arc<I>> {
        if TypeDescriptor::of::<I>() != self.subject {
            return Err(not_found(std::any::type_name::<I>()));
        }
        self.service::<I>()
    }

    /// Any concrete dependency of the result
    pub fn get<T: Any + Send + Sync>(&self) -> ResolveResult<Arc<T>> {
        let descriptor = TypeDescriptor::of::<T>();
        self.implementation(&descriptor)?
            .clone()
            .downcast::<T>()
            .map_err(|_| not_found(descriptor.name()))
    }

    /// Implementation of an interface dependency
    pub fn service<I: ?Sized + Send + Sync + 'static>(&self) -> ResolveResult<Arc<I>> {
        let descriptor = TypeDescriptor::of::<I>();
        self.implementation(&descriptor)?
            .downcast_ref::<Arc<I>>()
            .cloned()
            .ok_or_else(|| not_found(descriptor.name()))
    }

    /// Control handle of a mocked dependency
    pub fn control_handle<I: ?Sized + 'static>(&self) -> ResolveResult<MockHandle<I>> {
        let descriptor = TypeDescriptor::of::<I>();
        let record = self
            .records
            .get(&descriptor)
            .ok_or_else(|| not_found(descriptor.name()))?;
        record
            .control
            .clone()
            .map(MockHandle::new)
            .ok_or_else(|| ResolveError::NotMocked {
                type_name: descriptor.name().to_string(),
            })
    }
}
