//! Classification and constructor-selection policy.
//!
//! Both are pure functions of the type metadata; callers that want memoization go
//! through `ReflectionCache`.

use crate::domain::error::{ResolveError, ResolveResult};
use crate::domain::ports::TypeMetadata;
use crate::domain::type_registry::{TypeDescriptor, TypeKind};
use serde::Serialize;

/// Synthesis strategy of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Primitive, string, enum or other value type: resolved to its default
    LeafPrimitive,
    /// Interface: mocked
    LeafInterface,
    /// Concrete type with a zero-argument constructor
    LeafEmptyConstructible,
    /// Concrete type with a constructor taking only value-like parameters
    LeafPrimitiveConstructible,
    /// Recurse into the preferred constructor's parameters
    Composite,
}

impl Strategy {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Strategy::Composite)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::LeafPrimitive => "leaf-primitive",
            Strategy::LeafInterface => "leaf-interface",
            Strategy::LeafEmptyConstructible => "leaf-empty-constructible",
            Strategy::LeafPrimitiveConstructible => "leaf-primitive-constructible",
            Strategy::Composite => "composite",
        }
    }
}

/// Primitive, string, enum or value type. Unregistered types are not value-like.
pub fn is_value_like(metadata: &dyn TypeMetadata, descriptor: &TypeDescriptor) -> bool {
    metadata
        .type_info(descriptor)
        .is_some_and(|info| info.kind.is_value_like())
}

/// Rules in priority order; the first match wins.
pub fn classify(metadata: &dyn TypeMetadata, descriptor: &TypeDescriptor) -> Strategy {
    let Some(info) = metadata.type_info(descriptor) else {
        return Strategy::Composite;
    };

    if info.kind.is_value_like() {
        return Strategy::LeafPrimitive;
    }
    if info.kind == TypeKind::Interface {
        return Strategy::LeafInterface;
    }
    if info.constructors.iter().any(|c| c.arity() == 0) {
        return Strategy::LeafEmptyConstructible;
    }
    if primitive_constructor_index(metadata, descriptor).is_some() {
        return Strategy::LeafPrimitiveConstructible;
    }
    Strategy::Composite
}

/// Preferred constructor: the zero-argument one if present, otherwise the one with the
/// fewest parameters, ties broken by declaration order. Visibility is ignored.
pub fn select_constructor(
    metadata: &dyn TypeMetadata,
    descriptor: &TypeDescriptor,
) -> ResolveResult<usize> {
    let constructors = metadata
        .type_info(descriptor)
        .map(|info| info.constructors.as_slice())
        .unwrap_or_default();

    // min_by_key keeps the first of equal minima, so a zero-arity constructor
    // and declaration-order ties both fall out of the same scan.
    constructors
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.arity())
        .map(|(index, _)| index)
        .ok_or_else(|| ResolveError::NoConstructorFound {
            type_name: descriptor.name().to_string(),
        })
}

/// Constructor whose parameters are all value-like; fewest parameters first.
pub fn primitive_constructor_index(
    metadata: &dyn TypeMetadata,
    descriptor: &TypeDescriptor,
) -> Option<usize> {
    let info = metadata.type_info(descriptor)?;
    info.constructors
        .iter()
        .enumerate()
        .filter(|(_, c)| c.params.iter().all(|p| is_value_like(metadata, p)))
        .min_by_key(|(_, c)| c.arity())
        .map(|(index, _)| index)
}
