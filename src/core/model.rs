//! Model description and payload.
//!
//! A [`ModelSpec`] carries the tags the store needs to register a model;
//! a [`ModelBlob`] carries the serialized model itself, treated as opaque
//! bytes.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Key the model is registered under by default.
pub const DEFAULT_MODEL_KEY: &str = "career_model";

/// Model file read by default.
pub const DEFAULT_MODEL_FILE: &str = "career_model.pt";

/// Plain key used by the base64 upload path.
pub const DEFAULT_UPLOAD_KEY: &str = "model:career_predictor";

/// Model file read by default by the base64 upload path.
pub const DEFAULT_UPLOAD_FILE: &str = "career_model.onnx";

/// Framework the model was serialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Backend {
    /// TensorFlow graph.
    Tf,
    /// TensorFlow Lite flat buffer.
    Tflite,
    /// TorchScript.
    Torch,
    /// ONNX graph.
    Onnx,
}

impl Backend {
    /// Wire form of the backend tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tf => "TF",
            Self::Tflite => "TFLITE",
            Self::Torch => "TORCH",
            Self::Onnx => "ONNX",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TF" => Ok(Self::Tf),
            "TFLITE" => Ok(Self::Tflite),
            "TORCH" => Ok(Self::Torch),
            "ONNX" => Ok(Self::Onnx),
            _ => Err(Error::InvalidSpec {
                message: format!("unknown backend: {s}"),
            }),
        }
    }
}

/// Device the store should run the model on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Host CPU.
    Cpu,
    /// Default GPU.
    Gpu,
    /// A specific GPU by ordinal.
    GpuN(u32),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("CPU"),
            Self::Gpu => f.write_str("GPU"),
            Self::GpuN(n) => write!(f, "GPU:{n}"),
        }
    }
}

impl FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_uppercase();
        match upper.as_str() {
            "CPU" => Ok(Self::Cpu),
            "GPU" => Ok(Self::Gpu),
            _ => upper
                .strip_prefix("GPU:")
                .and_then(|n| n.parse::<u32>().ok())
                .map(Self::GpuN)
                .ok_or_else(|| Error::InvalidSpec {
                    message: format!("unknown device: {s}"),
                }),
        }
    }
}

impl Serialize for Device {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything the store needs to know about a model besides its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    /// Key the model is registered under.
    pub key: String,
    /// Serialization framework.
    pub backend: Backend,
    /// Execution device.
    pub device: Device,
    /// Free-form tag stored alongside the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Batch size for auto-batching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    /// Minimum batch size before running a batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_batch_size: Option<u32>,
    /// Input node names (TF only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    /// Output node names (TF only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            key: DEFAULT_MODEL_KEY.to_string(),
            backend: Backend::Torch,
            device: Device::Cpu,
            tag: None,
            batch_size: None,
            min_batch_size: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl ModelSpec {
    /// Checks the spec for combinations the store would reject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpec`] for an empty key, a TF model without
    /// inputs and outputs, or a minimum batch size without a batch size.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(invalid("model key must not be empty"));
        }
        if self.backend == Backend::Tf && (self.inputs.is_empty() || self.outputs.is_empty()) {
            return Err(invalid("TF models require both inputs and outputs"));
        }
        if self.min_batch_size.is_some() && self.batch_size.is_none() {
            return Err(invalid("min batch size requires a batch size"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidSpec {
        message: message.to_string(),
    }
}

/// Serialized model bytes and where they came from.
///
/// The bytes live in whatever buffer the reader produced: an owned vector
/// for small files, a memory map for large ones.
pub struct ModelBlob {
    source: PathBuf,
    bytes: Box<dyn AsRef<[u8]> + Send + Sync>,
}

impl ModelBlob {
    /// Wraps bytes read from `source`.
    #[must_use]
    pub fn new(source: PathBuf, bytes: Vec<u8>) -> Self {
        Self::from_buffer(source, bytes)
    }

    /// Wraps any byte buffer read from `source` without copying it.
    #[must_use]
    pub fn from_buffer<B>(source: PathBuf, bytes: B) -> Self
    where
        B: AsRef<[u8]> + Send + Sync + 'static,
    {
        Self {
            source,
            bytes: Box::new(bytes),
        }
    }

    /// File the bytes were read from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        (*self.bytes).as_ref()
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl fmt::Debug for ModelBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBlob")
            .field("source", &self.source)
            .field("len", &self.len())
            .finish()
    }
}

impl PartialEq for ModelBlob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ModelBlob {}
