//! Registration operations.
//!
//! Two ways of putting a model into the store: register it with the RedisAI
//! module (`AI.MODELSTORE`), or park it base64-encoded under a plain key for
//! clients that load it themselves.

use crate::core::{ModelBlob, ModelSpec};
use crate::error::Result;
use crate::store::{ModelMeta, ModelStore, ModelStoreRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

/// Outcome of the optional read-back check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Verification {
    /// No read-back was requested.
    Skipped,
    /// The store reports what was sent.
    Passed,
    /// The store reports something else.
    Mismatch(String),
}

impl Verification {
    /// Whether the check ran and failed.
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }
}

/// Result of [`register_model`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationReport {
    /// What was registered.
    pub spec: ModelSpec,
    /// Payload size in bytes.
    pub bytes: usize,
    /// Read-back outcome.
    pub verification: Verification,
}

/// Result of [`upload_encoded`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    /// Key the encoded model was written to.
    pub key: String,
    /// Raw payload size in bytes.
    pub bytes: usize,
    /// Encoded size in bytes.
    pub encoded_bytes: usize,
    /// Whether an existing value was replaced.
    pub overwritten: bool,
    /// Read-back outcome.
    pub verification: Verification,
}

/// Registers a model with the store's model registry.
///
/// Issues exactly one `AI.MODELSTORE`, replacing any model under the same
/// key. With `verify`, reads the model metadata back and compares backend
/// and device; once the model is stored, a failed read-back is reported as
/// a mismatch rather than raised.
///
/// # Errors
///
/// Returns an error if the spec is invalid or `AI.MODELSTORE` fails.
pub fn register_model<S: ModelStore + ?Sized>(
    store: &mut S,
    spec: &ModelSpec,
    blob: &ModelBlob,
    verify: bool,
) -> Result<RegistrationReport> {
    spec.validate()?;

    tracing::info!(
        key = %spec.key,
        backend = %spec.backend,
        device = %spec.device,
        bytes = blob.len(),
        "registering model"
    );
    store.store_model(&ModelStoreRequest::new(spec, blob))?;

    let verification = if verify {
        match store.model_meta(&spec.key) {
            Ok(meta) => check_meta(spec, meta),
            Err(e) => Verification::Mismatch(format!("read-back failed: {e}")),
        }
    } else {
        Verification::Skipped
    };
    if let Verification::Mismatch(reason) = &verification {
        tracing::warn!(key = %spec.key, %reason, "model read-back mismatch");
    }

    Ok(RegistrationReport {
        spec: spec.clone(),
        bytes: blob.len(),
        verification,
    })
}

fn check_meta(spec: &ModelSpec, meta: Option<ModelMeta>) -> Verification {
    let Some(meta) = meta else {
        return Verification::Mismatch("model not found after store".to_string());
    };

    let backend = spec.backend.to_string();
    let device = spec.device.to_string();
    if !meta.backend.eq_ignore_ascii_case(&backend) {
        Verification::Mismatch(format!(
            "backend is {}, expected {backend}",
            meta.backend
        ))
    } else if !meta.device.eq_ignore_ascii_case(&device) {
        Verification::Mismatch(format!("device is {}, expected {device}", meta.device))
    } else {
        Verification::Passed
    }
}

/// Stores a model base64-encoded under a plain key.
///
/// Replaces any existing value, logging a warning when it does. With
/// `verify`, compares the stored length with the encoded length; a
/// difference is reported, not raised.
///
/// # Errors
///
/// Returns an error if the key is empty or any store command fails.
pub fn upload_encoded<S: ModelStore + ?Sized>(
    store: &mut S,
    key: &str,
    blob: &ModelBlob,
    verify: bool,
) -> Result<UploadReport> {
    if key.trim().is_empty() {
        return Err(crate::Error::InvalidSpec {
            message: "upload key must not be empty".to_string(),
        });
    }

    let overwritten = store.exists(key)?;
    if overwritten {
        tracing::warn!(%key, "value already exists, overwriting");
    }

    let encoded = STANDARD.encode(blob.as_bytes());
    tracing::info!(%key, bytes = blob.len(), encoded_bytes = encoded.len(), "uploading model");
    store.set_value(key, encoded.as_bytes())?;

    let verification = if verify {
        let stored = store.value_len(key)?;
        if stored == encoded.len() {
            Verification::Passed
        } else {
            Verification::Mismatch(format!(
                "stored {stored} bytes, expected {}",
                encoded.len()
            ))
        }
    } else {
        Verification::Skipped
    };
    if let Verification::Mismatch(reason) = &verification {
        tracing::warn!(%key, %reason, "size mismatch, stored value may be corrupted");
    }

    Ok(UploadReport {
        key: key.to_string(),
        bytes: blob.len(),
        encoded_bytes: encoded.len(),
        overwritten,
        verification,
    })
}
