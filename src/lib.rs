//! deep-automock library: dependency-graph resolution with automatic mocking.
//!
//! Register types and their constructor signatures in a [`TypeRegistry`], then let
//! an [`AutoMocker`] build any of them: interfaces become mocks driven through a
//! [`MockControl`], value types take their defaults, and concrete types are
//! constructed bottom-up.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod demo;
pub mod domain;
pub mod symbol;

pub use app::config::ResolverConfig;
pub use app::engine::{AutoMocker, AutoMockerBuilder};
pub use domain::error::{ResolveError, ResolveResult};
pub use domain::mock::{DefaultValue, MockControl, MockHandle};
pub use domain::result::{ConstructionRecord, ConstructionResult};
pub use domain::type_registry::{Args, Instance, TypeDescriptor, TypeRegistry};
