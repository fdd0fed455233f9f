//! Core domain models.
//!
//! Connection parameters, model descriptions and the model payload. These
//! are pure data types with no network or file I/O.

pub mod connection;
pub mod model;

pub use connection::{ConnectionInfo, DEFAULT_PORT, REDIS_URL_ENV};
pub use model::{
    Backend, DEFAULT_MODEL_FILE, DEFAULT_MODEL_KEY, DEFAULT_UPLOAD_FILE, DEFAULT_UPLOAD_KEY,
    Device, ModelBlob, ModelSpec,
};
