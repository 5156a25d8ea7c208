//! Final document assembly and rendering.

use schemagen_core::Definitions;

use crate::error::Result;
use crate::upstream::UpstreamDocument;

/// Merges the generated definitions into `document`, overwriting any
/// upstream definition that shares a key.
pub fn merge_generated(document: &mut UpstreamDocument, definitions: Definitions) {
    for (key, entry) in definitions {
        document.definitions.insert(key, entry.into());
    }
}

/// Renders the merged document as two-space-indented JSON.
pub fn render(document: &UpstreamDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use schemagen_core::{PropertySchema, SchemaEntry};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_generated_entries_overwrite_upstream_keys() {
        let mut document: UpstreamDocument = serde_json::from_value(json!({
            "definitions": {
                "io.kedge.AppSpec": {"description": "stale"},
                "io.k8s.Widget": {"description": "upstream"}
            }
        }))
        .unwrap();

        let mut definitions = Definitions::new();
        definitions.insert(
            "io.kedge.AppSpec".to_string(),
            SchemaEntry::new("fresh")
                .with_property("name", PropertySchema::scalar("string", ""))
                .with_required("name"),
        );

        merge_generated(&mut document, definitions);

        assert_eq!(document.definitions["io.kedge.AppSpec"].description, "fresh");
        assert_eq!(document.definitions["io.k8s.Widget"].description, "upstream");
    }

    #[test]
    fn test_render_is_indented_and_stable() {
        let document: UpstreamDocument = serde_json::from_value(json!({
            "definitions": {"io.kedge.AppSpec": {"description": "d"}},
            "swagger": "2.0"
        }))
        .unwrap();

        let first = render(&document).unwrap();
        let second = render(&document).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("  \"definitions\""));
    }
}
