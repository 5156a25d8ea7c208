//! Error types for declaration extraction.
//!
//! Every failure is terminal for the run: the caller sees a single
//! diagnostic carrying the originating declaration or field context, and no
//! partial schema model is ever returned.

use thiserror::Error;

/// Errors that can occur while extracting schema definitions from a
/// declaration source unit.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source unit does not match the declaration grammar.
    #[error("could not parse the declaration source at line {line}: {message}")]
    Declaration { line: usize, message: String },

    /// A field's serialization tag is missing, malformed, or names more
    /// than one tag.
    #[error("name extraction from serialization tag failed for field `{field}`: {message}")]
    Tag { field: String, message: String },

    /// A field's declared type is not one of the supported forms.
    #[error("could not determine the type of field `{field}`: {message}")]
    Classification { field: String, message: String },
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
