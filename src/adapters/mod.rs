pub mod mock_provider;
pub mod observer;
