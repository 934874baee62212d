pub mod config;
pub mod dto;
pub mod engine;

pub use config::ResolverConfig;
pub use engine::{AutoMocker, AutoMockerBuilder};
