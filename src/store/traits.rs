//! Store trait definition.
//!
//! The loader talks to the remote store only through [`ModelStore`], so the
//! registration flow can run against an in-memory implementation in tests.

use crate::error::Result;
use crate::store::command::ModelStoreRequest;
use serde::Serialize;

/// Trait for the remote store the model is registered with.
pub trait ModelStore {
    /// Registers a model (`AI.MODELSTORE`).
    ///
    /// Replaces any model already stored under the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the command or the transport fails.
    fn store_model(&mut self, request: &ModelStoreRequest<'_>) -> Result<()>;

    /// Reads model metadata back (`AI.MODELGET <key> META`).
    ///
    /// Returns `None` if no model is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails for any other reason.
    fn model_meta(&mut self, key: &str) -> Result<Option<ModelMeta>>;

    /// Checks whether a plain key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn exists(&mut self, key: &str) -> Result<bool>;

    /// Stores a value under a plain key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Length of the value stored under `key`; 0 if the key is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn value_len(&mut self, key: &str) -> Result<usize>;
}

/// Model metadata as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ModelMeta {
    /// Backend tag.
    pub backend: String,
    /// Device tag.
    pub device: String,
    /// Free-form tag (empty when none was set).
    pub tag: String,
}
