//! Error types for document loading and assembly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, merging, or rendering documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// An upstream document (or the declaration source) cannot be read.
    #[error("cannot read file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An upstream document is not valid JSON of the expected shape.
    #[error("error unmarshalling {path:?} into an open API definition: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No upstream schema document was supplied.
    #[error("no upstream schema documents were provided")]
    NoUpstreamDocuments,

    /// Final JSON encoding failed. Well-formed internal structures never
    /// trigger this; seeing it means a builder invariant was violated.
    #[error("could not encode the merged document: {0}")]
    Marshal(#[from] serde_json::Error),
}

/// Convenience alias for results with [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;
