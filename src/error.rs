//! Error types for document loading, schema resolution and signature derivation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving schemas and deriving signatures.
///
/// Every variant aborts the current generation attempt: the input is static,
/// so retrying cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("blank identifier")]
    InvalidIdentifier,

    #[error("unknown type {tag}")]
    UnknownType { tag: String },

    #[error("type not found: [{}]", types.join(", "))]
    TypeNotFound { types: Vec<String> },

    #[error("unresolved pointer {pointer}")]
    UnresolvedPointer { pointer: String },

    #[error("no href property declared for {title}")]
    MissingHRef { title: String },

    #[error("cyclic reference through {pointer}")]
    CyclicReference { pointer: String },
}

impl SchemaError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading a document from text, disk or the network.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document at {path}: {message}")]
    InvalidDocument { path: String, message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
