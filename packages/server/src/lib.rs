// Dev Events - API Core
//
// Backend for publishing developer events and booking seats on them.
// Routes call domain actions; actions call models and kernel services.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
