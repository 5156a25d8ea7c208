//! The end-to-end conversion pipeline.
//!
//! Ties the stages together in their fixed order: extract the declaration
//! source, load and merge the upstream document(s), resolve the injections,
//! fold the generated definitions into the document, optionally narrow to
//! the workload keys, and render.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use schemagen_core::{WORKLOAD_KEYS, inject, retain_keys};
use schemagen_extract::{ExtractError, generate_definitions};

use crate::assemble::{merge_generated, render};
use crate::error::DocumentError;
use crate::upstream::{load_document, merge_documents};

/// Inputs of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Path of the annotated declaration source unit.
    pub declaration_path: PathBuf,
    /// Paths of the upstream schema documents; later documents overwrite
    /// earlier ones on key collision.
    pub schema_paths: Vec<PathBuf>,
    /// Narrow the output definitions to the workload keys.
    pub controller_only: bool,
}

/// Errors surfaced by [`convert`].
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Runs the whole pipeline and returns the rendered merged document.
///
/// Every failure is terminal: no partial document is ever produced.
pub fn convert(options: &ConvertOptions) -> Result<String, ConvertError> {
    let source = fs::read_to_string(&options.declaration_path).map_err(|source| {
        DocumentError::Read {
            path: options.declaration_path.clone(),
            source,
        }
    })?;
    let extraction = generate_definitions(&source)?;
    debug!(
        definitions = extraction.definitions.len(),
        injections = extraction.injections.len(),
        "extracted declaration source"
    );

    let mut paths = options.schema_paths.iter();
    let first = paths.next().ok_or(DocumentError::NoUpstreamDocuments)?;
    let mut document = load_document(first)?;
    for path in paths {
        merge_documents(&mut document, load_document(path)?);
    }

    let mut definitions = extraction.definitions;
    inject(&mut definitions, &document.definitions, &extraction.injections);

    merge_generated(&mut document, definitions);
    if options.controller_only {
        retain_keys(&mut document.definitions, Some(WORKLOAD_KEYS));
    }

    Ok(render(&document)?)
}
