//! Error types for model registration.
//!
//! Every failure the tool can hit (bad connection string, unreadable model
//! file, unreachable or rejecting store) is a variant of [`Error`], so the
//! binary can report all of them through a single boundary.

use thiserror::Error;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection string errors.
    #[error("connection string error: {0}")]
    Connection(#[from] ConnectionError),

    /// I/O errors (model file access).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Errors reported by, or while talking to, the remote store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Model description is not acceptable to the store.
    #[error("invalid model spec: {message}")]
    InvalidSpec {
        /// Why the spec was rejected.
        message: String,
    },
}

/// Connection string parsing errors.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Not a URL at all.
    #[error("malformed URL: {0}")]
    Malformed(String),

    /// Scheme other than `redis` / `rediss`.
    #[error("unsupported scheme: {scheme}")]
    UnsupportedScheme {
        /// Scheme found in the URL.
        scheme: String,
    },

    /// URL carries no host.
    #[error("missing host")]
    MissingHost,

    /// Path is not a database index.
    #[error("invalid database index: {path}")]
    InvalidDatabase {
        /// Path component that failed to parse.
        path: String,
    },

    /// Userinfo is not valid UTF-8 after percent-decoding.
    #[error("credentials are not valid UTF-8")]
    InvalidCredentials,
}

/// I/O-specific errors for the model file.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

/// Errors from the remote store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not open or authenticate the connection.
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// The store answered a command with an error.
    #[error("{command} rejected: {reason}")]
    CommandRejected {
        /// Command name.
        command: String,
        /// Error text returned by the store.
        reason: String,
    },

    /// A reply had an unexpected shape.
    #[error("unexpected reply to {command}: {reason}")]
    UnexpectedReply {
        /// Command name.
        command: String,
        /// What was wrong with the reply.
        reason: String,
    },

    /// Transport-level failure after connecting.
    #[error("transport error: {0}")]
    Transport(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArgument(String),
}

impl StoreError {
    /// Classifies a client error raised while running `command`.
    pub fn from_redis(command: &str, err: &redis::RedisError) -> Self {
        if err.kind() == redis::ErrorKind::ResponseError
            || err.kind() == redis::ErrorKind::ExtensionError
        {
            Self::CommandRejected {
                command: command.to_string(),
                reason: err.to_string(),
            }
        } else if err.kind() == redis::ErrorKind::TypeError {
            Self::UnexpectedReply {
                command: command.to_string(),
                reason: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ConnectionError {
    fn from(err: url::ParseError) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Connection(err.into())
    }
}
