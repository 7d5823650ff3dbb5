//! Error types for json-typedecl.
//!
//! Inference and synthesis only fail on inputs JSON cannot express (cycles,
//! non-object roots). Everything else here belongs to the I/O glue.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cycle detected at {path}: a container contains itself")]
    CycleDetected { path: String },

    #[error("expected a keyed object at the root, found {kind}")]
    RootNotKeyed { kind: &'static str },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid options at {path}: {message}")]
    Options { path: String, message: String },

    #[error("jq filter failed: {0}")]
    Jq(String),

    #[error("bad input pattern: {0}")]
    Glob(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
