//! Upstream document handling and the conversion pipeline.
//!
//! This crate owns everything at the document boundary:
//!
//! - [`UpstreamDocument`] — a published schema document whose `definitions`
//!   member is the injection namespace; all other members pass through.
//! - [`load_document`] / [`merge_documents`] — disk loading and
//!   last-writer-wins merging of several upstream documents.
//! - [`merge_generated`] / [`render`] — folding the generated definitions
//!   into the document and emitting indented JSON.
//! - [`convert`] — the end-to-end pipeline the CLI invokes.
//!
//! # Example
//!
//! ```no_run
//! use schemagen_document::{ConvertOptions, convert};
//!
//! let options = ConvertOptions {
//!     declaration_path: "types.go".into(),
//!     schema_paths: vec!["swagger.json".into()],
//!     controller_only: false,
//! };
//! let merged = convert(&options).unwrap();
//! println!("{merged}");
//! ```

mod assemble;
mod convert;
mod error;
mod upstream;

pub use assemble::{merge_generated, render};
pub use convert::{ConvertError, ConvertOptions, convert};
pub use error::{DocumentError, Result};
pub use upstream::{UpstreamDocument, load_document, merge_documents};
