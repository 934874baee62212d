//! Error types for dependency resolution

use thiserror::Error;

/// Every variant names the offending type. Any of them aborts the whole resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("no public, protected or private constructor found for {type_name}")]
    NoConstructorFound { type_name: String },

    #[error("dependency graph of {root} exceeded {limit} nodes (cyclic or explosively wide constructor graph?)")]
    GraphTooLarge { root: String, limit: usize },

    #[error("failed to synthesize a mock for {type_name}: {reason}")]
    SynthesisFailed { type_name: String, reason: String },

    #[error("failed to construct {type_name}: {reason}")]
    ConstructionFailed { type_name: String, reason: String },

    #[error("{type_name} is not part of this construction result")]
    NotFound { type_name: String },

    #[error("{type_name} was constructed, not mocked")]
    NotMocked { type_name: String },
}

impl ResolveError {
    pub fn type_name(&self) -> &str {
        match self {
            ResolveError::NoConstructorFound { type_name }
            | ResolveError::SynthesisFailed { type_name, .. }
            | ResolveError::ConstructionFailed { type_name, .. }
            | ResolveError::NotFound { type_name }
            | ResolveError::NotMocked { type_name } => type_name,
            ResolveError::GraphTooLarge { root, .. } => root,
        }
    }
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
