//! Construction observers: purely observational, never influence resolution

pub mod fixture_script;
pub mod logging;

pub use fixture_script::FixtureScript;
pub use logging::TracingObserver;
