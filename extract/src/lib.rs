//! Declaration-to-schema extraction.
//!
//! This crate is the front end of the schema generator: it parses a source
//! unit of annotated type declarations (a Go-style file used purely as a
//! schema-authoring DSL) and produces the generated definitions plus the
//! deferred injection instructions the cross-schema injector resolves later.
//!
//! The pipeline per declaration:
//!
//! 1. [`SourceUnit::parse`] scans the unit into declarations, fields, type
//!    expressions, comment blocks, and tags.
//! 2. [`declaration_directives`] / [`field_directives`] interpret the
//!    structured comments (`kedgeSpec:`, `ref:`/`k8s:`, `+optional`).
//! 3. [`classify`] maps each field's declared type to one of the closed set
//!    of semantic kinds.
//! 4. [`generate_definitions`] assembles the schema model, inlining
//!    same-unit embedded declarations and recording an [`Injection`] for
//!    every cross-package field.
//!
//! # Example
//!
//! ```
//! use schemagen_extract::generate_definitions;
//!
//! let source = r#"
//! // A web application
//! // kedgeSpec: io.kedge.AppSpec
//! type App struct {
//!     // Name of the app
//!     Name string `json:"name"`
//!     // k8s: io.k8s.api.core.v1.PodSpec
//!     api_v1.PodSpec `json:",inline"`
//! }
//! "#;
//!
//! let extraction = generate_definitions(source).unwrap();
//! assert_eq!(extraction.definitions["io.kedge.AppSpec"].required, vec!["name"]);
//! assert_eq!(extraction.injections[0].source, "io.k8s.api.core.v1.PodSpec");
//! ```
//!
//! [`Injection`]: schemagen_core::Injection

mod builder;
mod classify;
mod directives;
mod error;
mod source;
mod tags;

pub use builder::{Extraction, generate_definitions};
pub use classify::{FieldKind, classify};
pub use directives::{
    FieldDirectives, KEY_DIRECTIVE, OPTIONAL_MARKER, REF_DIRECTIVES, declaration_directives,
    field_directives,
};
pub use error::{ExtractError, Result};
pub use source::{Declaration, DeclarationIndex, Field, SourceUnit, TypeExpr, parse_type};
pub use tags::serialization_name;
