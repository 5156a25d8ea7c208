//! Core schema model and merge primitives for the schema generator.
//!
//! This crate defines the foundational types for modeling generated schema
//! definitions and the operations that combine them with upstream schema
//! documents:
//!
//! - [`SchemaEntry`] — one named definition (description, properties,
//!   required-field list).
//! - [`PropertySchema`] — a single property in one of the four generated
//!   shapes, or a value borrowed verbatim from upstream.
//! - [`Injection`] — a deferred instruction to copy an upstream entry's
//!   properties into a generated entry.
//! - [`inject`] — resolves injections against an upstream namespace, with
//!   the key-specific required-list exceptions in [`REQUIRED_DEMOTIONS`].
//! - [`retain_keys`] — allow-list filtering of a definitions map.
//!
//! # Example
//!
//! ```
//! use schemagen_core::*;
//!
//! let mut definitions = Definitions::new();
//! definitions.insert(
//!     "io.kedge.AppSpec".to_string(),
//!     SchemaEntry::new("An application")
//!         .with_property("name", PropertySchema::scalar("string", "App name"))
//!         .with_required("name"),
//! );
//!
//! inject(
//!     &mut definitions,
//!     &UpstreamDefinitions::new(),
//!     &[Injection::new("io.kedge.AppSpec", "io.k8s.api.core.v1.PodSpec")],
//! );
//!
//! assert_eq!(definitions["io.kedge.AppSpec"].required, vec!["name"]);
//! ```

mod filter;
mod inject;
mod schema;

pub use filter::{WORKLOAD_KEYS, retain_keys};
pub use inject::{REQUIRED_DEMOTIONS, inject, union_unique};
pub use schema::{
    Definitions, Injection, PropertySchema, REF_PREFIX, SchemaEntry, UpstreamDefinitions,
    UpstreamEntry,
};
