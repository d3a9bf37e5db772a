//! Common test infrastructure for dsfhub-client tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Tokens, identifiers and paths shared across tests
//! - `fixtures`: Configurations and envelope bodies for both kinds
//! - `mock_server`: Wiremock setup helpers and hub clients pointed at them
//! - `memory_hub`: In-memory transport that stores and echoes payloads

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fixtures;
pub mod memory_hub;
pub mod mock_server;

pub use constants::*;
pub use fixtures::*;
pub use memory_hub::*;
pub use mock_server::*;

/// Route client logs to the test output, filtered by RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
