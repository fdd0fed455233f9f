//! # redisai-loader
//!
//! Registers a serialized machine-learning model with a Redis server running
//! the RedisAI module.
//!
//! The whole job is one pass: parse the connection string from `REDIS_URL`,
//! read the model file, open a TLS connection, send `AI.MODELSTORE`, report.
//!
//! ## Features
//!
//! - **Connection strings**: parsed as URLs, percent-encoded credentials supported
//! - **Model registration**: `AI.MODELSTORE` with backend, device and batching options
//! - **Base64 upload**: models parked under a plain key for self-loading clients
//! - **Read-back checks**: optional verification after either path

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod cli;
pub mod core;
pub mod error;
pub mod io;
pub mod loader;
pub mod logging;
pub mod store;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Backend, ConnectionInfo, Device, ModelBlob, ModelSpec};

// Re-export store types
pub use store::{ConnectOptions, ModelMeta, ModelStore, ModelStoreRequest, RedisModelStore};

// Re-export loader operations
pub use loader::{RegistrationReport, UploadReport, Verification, register_model, upload_encoded};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
