//! Scale decoder common library
//!
//! Shared infrastructure used by the frame codec and the operator tooling:
//! - configuration file loading (YAML / JSON / TOML via figment)
//! - logging initialisation (tracing-subscriber, optional rolling file output)
//! - hex encoding/decoding helpers for raw frames
//! - serde helpers for device profile documents

pub mod config;
pub mod error;
pub mod hex;
pub mod logging;
pub mod serde_helpers;

pub use error::{Error, Result};
pub use logging::{init_logging, LogConfig, LogConfigBuilder, LogFormat, Rotation};

