//! Mocking collaborator adapters

pub mod proxy;

pub use proxy::ProxyMockProvider;
