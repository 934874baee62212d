pub mod builder;
pub mod cache;
pub mod error;
pub mod graph;
pub mod instance;
pub mod mock;
pub mod node;
pub mod policy;
pub mod ports;
pub mod result;
pub mod synthesizer;
pub mod type_registry;
