pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod render;
pub mod server;

// Application use cases and the ports they depend on
pub mod app;

// Adapters for the external services behind the ports
pub mod gateway;
