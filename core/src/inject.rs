//! Cross-schema injection of upstream properties into generated entries.
//!
//! The schema builder records an [`Injection`] for every field whose type
//! lives in another package. [`inject`] resolves those instructions against
//! the upstream namespace: missing properties are copied in verbatim,
//! required-lists are merged as a set union, and a small table of
//! key-specific exceptions demotes fields whose requiredness is governed by
//! the generated declarations rather than the borrowed upstream contract.
//!
//! # Example
//!
//! ```
//! use schemagen_core::*;
//! use std::collections::BTreeMap;
//!
//! let mut definitions = Definitions::new();
//! definitions.insert("io.kedge.Widget".to_string(), SchemaEntry::new(""));
//!
//! let mut upstream = UpstreamDefinitions::new();
//! upstream.insert(
//!     "upstream.Widget".to_string(),
//!     UpstreamEntry {
//!         properties: BTreeMap::from([(
//!             "size".to_string(),
//!             serde_json::json!({"type": "integer"}),
//!         )]),
//!         required: vec!["size".to_string()],
//!         ..UpstreamEntry::default()
//!     },
//! );
//!
//! inject(
//!     &mut definitions,
//!     &upstream,
//!     &[Injection::new("io.kedge.Widget", "upstream.Widget")],
//! );
//!
//! let widget = &definitions["io.kedge.Widget"];
//! assert!(widget.properties.contains_key("size"));
//! assert_eq!(widget.required, vec!["size"]);
//! ```

use std::collections::HashSet;

use crate::schema::{Definitions, Injection, PropertySchema, SchemaEntry, UpstreamDefinitions, UpstreamEntry};

/// Fields whose upstream requiredness is dropped after injection, keyed by
/// the literal target schema key.
///
/// The workload entries declare their own nested `template` semantics, and
/// the container entry always supplies its own `name` property; in both
/// cases the borrowed upstream contract must not force the field.
pub const REQUIRED_DEMOTIONS: &[(&str, &str)] = &[
    ("io.kedge.DeploymentSpecMod", "template"),
    ("io.kedge.DeploymentConfigSpecMod", "template"),
    ("io.kedge.JobSpecMod", "template"),
    ("io.kedge.ContainerSpec", "name"),
];

/// Resolves `injections` in discovery order against `upstream`, mutating
/// `definitions` in place.
///
/// For each instruction the source entry's properties are copied into the
/// target wherever the target does not already define the name, and the
/// required-lists are merged as a duplicate-free union. A source key absent
/// from `upstream` contributes nothing. After the merge,
/// [`REQUIRED_DEMOTIONS`] is applied to every key that was the target of at
/// least one instruction.
///
/// Re-running the same instruction list is a no-op: nothing new is copied
/// and the union is stable.
pub fn inject(
    definitions: &mut Definitions,
    upstream: &UpstreamDefinitions,
    injections: &[Injection],
) {
    let empty = UpstreamEntry::default();
    let mut targets: HashSet<&str> = HashSet::new();

    for injection in injections {
        let source = upstream.get(&injection.source).unwrap_or(&empty);
        let target = definitions.entry(injection.target.clone()).or_default();
        augment_properties(target, source);
        targets.insert(injection.target.as_str());
    }

    for (key, field) in REQUIRED_DEMOTIONS {
        if targets.contains(key)
            && let Some(entry) = definitions.get_mut(*key)
        {
            entry.required.retain(|name| name != field);
        }
    }
}

/// Copies missing properties from `source` into `target` and merges the
/// required-lists.
fn augment_properties(target: &mut SchemaEntry, source: &UpstreamEntry) {
    for (name, property) in &source.properties {
        if !target.properties.contains_key(name) {
            target
                .properties
                .insert(name.clone(), PropertySchema::Borrowed(property.clone()));
        }
    }
    target.required = union_unique(&target.required, &source.required);
}

/// Unions two name lists, keeping first-seen order and dropping duplicates.
pub fn union_unique(a: &[String], b: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();
    for item in a.iter().chain(b.iter()) {
        if seen.insert(item.as_str()) {
            merged.push(item.clone());
        }
    }
    merged
}
