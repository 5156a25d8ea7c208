//! Upstream schema document loading and merging.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use schemagen_core::UpstreamDefinitions;

use crate::error::{DocumentError, Result};

/// One upstream schema document, e.g. a published `swagger.json`.
///
/// Only the `definitions` member is interpreted; every other top-level
/// member (`swagger`, `info`, `paths`, …) passes through `rest` untouched
/// and reappears in the rendered output.
///
/// # Examples
///
/// ```
/// use schemagen_document::UpstreamDocument;
///
/// let document: UpstreamDocument = serde_json::from_value(serde_json::json!({
///     "swagger": "2.0",
///     "definitions": {
///         "io.k8s.Widget": {"description": "A widget", "properties": {}}
///     }
/// }))
/// .unwrap();
///
/// assert!(document.definitions.contains_key("io.k8s.Widget"));
/// assert_eq!(document.rest["swagger"], "2.0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamDocument {
    #[serde(default)]
    pub definitions: UpstreamDefinitions,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Loads one upstream document from disk.
///
/// # Errors
///
/// Returns [`DocumentError::Read`] or [`DocumentError::Parse`], each
/// carrying the offending path.
pub fn load_document(path: impl AsRef<Path>) -> Result<UpstreamDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: UpstreamDocument =
        serde_json::from_str(&content).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), definitions = document.definitions.len(), "loaded upstream document");
    Ok(document)
}

/// Merges `source`'s definitions into `target`; on key collision the
/// incoming definition wins.
pub fn merge_documents(target: &mut UpstreamDocument, source: UpstreamDocument) {
    for (key, entry) in source.definitions {
        target.definitions.insert(key, entry);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document(value: Value) -> UpstreamDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_top_level_members_round_trip() {
        let raw = json!({
            "definitions": {},
            "info": {"title": "Kubernetes"},
            "paths": {},
            "swagger": "2.0"
        });
        let doc = document(raw.clone());
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_merge_overwrites_colliding_keys() {
        let mut target = document(json!({
            "definitions": {
                "io.k8s.Widget": {"description": "old"},
                "io.k8s.Other": {"description": "kept"}
            }
        }));
        let source = document(json!({
            "definitions": {"io.k8s.Widget": {"description": "new"}}
        }));

        merge_documents(&mut target, source);

        assert_eq!(target.definitions["io.k8s.Widget"].description, "new");
        assert_eq!(target.definitions["io.k8s.Other"].description, "kept");
    }

    #[test]
    fn test_missing_definitions_member_defaults_to_empty() {
        let doc = document(json!({"swagger": "2.0"}));
        assert!(doc.definitions.is_empty());
    }
}
