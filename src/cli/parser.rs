//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros. The connection string
//! comes from `REDIS_URL` unless given on the command line.

use crate::core::{
    Backend, DEFAULT_MODEL_FILE, DEFAULT_MODEL_KEY, DEFAULT_UPLOAD_FILE, DEFAULT_UPLOAD_KEY,
    Device, ModelSpec,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Register a serialized model with a RedisAI-enabled Redis server.
///
/// Without a subcommand, stores `career_model.pt` as TORCH/CPU model
/// `career_model`.
#[derive(Parser, Debug)]
#[command(name = "redisai-loader")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Connection string, e.g. `redis://:password@host:port`.
    #[arg(long, env = "REDIS_URL", hide_env_values = true, global = true)]
    pub redis_url: Option<String>,

    /// Do not force TLS (a `rediss://` URL still uses it).
    ///
    /// From the environment, any value other than `0`, `false`, `no`, `off`
    /// or empty counts as set.
    #[arg(
        long,
        env = "REDISAI_NO_TLS",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_tls: bool,

    /// Skip TLS certificate verification.
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Connect and I/O timeout in seconds.
    #[arg(long, default_value = "10", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Exit with a failure status when registration fails.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute (defaults to `store`).
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Register a model with `AI.MODELSTORE`.
    Store(StoreArgs),

    /// Store a model base64-encoded under a plain key.
    Upload(UploadArgs),

    /// Parse the connection string and print it without credentials.
    InspectUrl,
}

/// Arguments for `store`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct StoreArgs {
    /// Model file to read.
    #[arg(short, long, default_value = DEFAULT_MODEL_FILE)]
    pub file: PathBuf,

    /// Key to register the model under.
    #[arg(short, long, default_value = DEFAULT_MODEL_KEY)]
    pub key: String,

    /// Serialization framework (TF, TFLITE, TORCH, ONNX).
    #[arg(short, long, default_value = "TORCH")]
    pub backend: Backend,

    /// Execution device (CPU, GPU, GPU:<n>).
    #[arg(short, long, default_value = "CPU")]
    pub device: Device,

    /// Tag stored alongside the model.
    #[arg(long)]
    pub tag: Option<String>,

    /// Batch size for auto-batching.
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Minimum batch size (requires --batch-size).
    #[arg(long, requires = "batch_size")]
    pub min_batch_size: Option<u32>,

    /// Input node names (TF only).
    #[arg(long, value_delimiter = ',')]
    pub inputs: Vec<String>,

    /// Output node names (TF only).
    #[arg(long, value_delimiter = ',')]
    pub outputs: Vec<String>,

    /// Read the model metadata back after storing.
    #[arg(long)]
    pub verify: bool,
}

impl Default for StoreArgs {
    fn default() -> Self {
        let spec = ModelSpec::default();
        Self {
            file: PathBuf::from(DEFAULT_MODEL_FILE),
            key: spec.key,
            backend: spec.backend,
            device: spec.device,
            tag: None,
            batch_size: None,
            min_batch_size: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            verify: false,
        }
    }
}

impl StoreArgs {
    /// Builds the model spec these arguments describe.
    #[must_use]
    pub fn to_spec(&self) -> ModelSpec {
        ModelSpec {
            key: self.key.clone(),
            backend: self.backend,
            device: self.device,
            tag: self.tag.clone(),
            batch_size: self.batch_size,
            min_batch_size: self.min_batch_size,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

/// Arguments for `upload`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UploadArgs {
    /// Model file to read.
    #[arg(short, long, default_value = DEFAULT_UPLOAD_FILE)]
    pub file: PathBuf,

    /// Key to write the encoded model to.
    #[arg(short, long, default_value = DEFAULT_UPLOAD_KEY)]
    pub key: String,

    /// Compare the stored size with the encoded size.
    #[arg(long)]
    pub verify: bool,
}

impl Cli {
    /// Returns the command to run, `store` with defaults if none was given.
    #[must_use]
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Store(StoreArgs::default()))
    }
}
