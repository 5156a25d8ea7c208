//! Schema building from parsed declarations.
//!
//! Walks every annotated declaration in source order, classifies each field,
//! and assembles the generated [`Definitions`] plus the deferred
//! [`Injection`] list. Declarations without a schema key exist only to be
//! embedded into others: a bare-identifier field whose type names another
//! declaration in the same unit folds that declaration's fields into the
//! current entry, under the current key. That is how an entry can be split
//! across a base type and layered "modifier" types.

use std::collections::HashSet;

use tracing::debug;

use schemagen_core::{Definitions, Injection, PropertySchema, SchemaEntry};

use crate::classify::{FieldKind, classify};
use crate::directives::{declaration_directives, field_directives};
use crate::error::{ExtractError, Result};
use crate::source::{Declaration, DeclarationIndex, SourceUnit, TypeExpr};
use crate::tags::serialization_name;

/// Output of one extraction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Generated definitions, keyed by schema key.
    pub definitions: Definitions,
    /// Injection instructions, in discovery order.
    pub injections: Vec<Injection>,
}

/// Parses `source` and builds the schema model.
///
/// Any parse, tag, or classification failure aborts the whole run; partial
/// output is never returned.
///
/// # Examples
///
/// ```
/// use schemagen_extract::generate_definitions;
///
/// let source = r#"
/// // kedgeSpec: io.kedge.AppSpec
/// type App struct {
///     // Name of the app
///     Name string `json:"name"`
/// }
/// "#;
///
/// let extraction = generate_definitions(source).unwrap();
/// let app = &extraction.definitions["io.kedge.AppSpec"];
/// assert_eq!(app.required, vec!["name"]);
/// ```
pub fn generate_definitions(source: &str) -> Result<Extraction> {
    let unit = SourceUnit::parse(source)?;
    let index = unit.index();

    let mut extraction = Extraction::default();
    for declaration in &unit.declarations {
        let (key, description) = declaration_directives(&declaration.doc);
        // declarations without a key exist only to be embedded elsewhere
        if key.is_empty() {
            debug!(declaration = %declaration.name, "skipping declaration without a schema key");
            continue;
        }
        extraction
            .definitions
            .entry(key.clone())
            .or_insert_with(|| SchemaEntry::new(&description));

        let mut visited = HashSet::from([declaration.name.clone()]);
        build_fields(declaration, &key, &index, &mut extraction, &mut visited)?;
    }

    for injection in &extraction.injections {
        debug!(target = %injection.target, source = %injection.source, "recorded injection");
    }
    Ok(extraction)
}

/// Processes one declaration's fields into the entry for `key`.
///
/// Embedded declarations re-enter here with the embedding declaration's key,
/// so their fields accumulate into the same entry; `visited` keeps an
/// embedding cycle from recursing forever.
fn build_fields(
    declaration: &Declaration,
    key: &str,
    index: &DeclarationIndex<'_>,
    extraction: &mut Extraction,
    visited: &mut HashSet<String>,
) -> Result<()> {
    for field in &declaration.fields {
        let name = serialization_name(field.tag.as_deref()).map_err(|message| {
            ExtractError::Tag {
                field: field.label(),
                message,
            }
        })?;
        let kind = classify(&field.ty).map_err(|message| ExtractError::Classification {
            field: field.label(),
            message,
        })?;
        let directives = field_directives(&field.doc);

        let property = match kind {
            FieldKind::Embedded => {
                if let TypeExpr::Named(type_name) = &field.ty {
                    match index.get(type_name.as_str()) {
                        Some(embedded) => {
                            if visited.insert(type_name.clone()) {
                                debug!(
                                    declaration = %embedded.name,
                                    target_key = %key,
                                    "inlining embedded declaration"
                                );
                                build_fields(embedded, key, index, extraction, visited)?;
                            } else {
                                debug!(
                                    declaration = %type_name,
                                    target_key = %key,
                                    "skipping already inlined declaration"
                                );
                            }
                        }
                        // a bare identifier that names no struct here has
                        // nothing to contribute
                        None => {
                            debug!(field = %field.label(), "skipping unresolved identifier field");
                        }
                    }
                }
                None
            }
            FieldKind::CrossPackage => {
                extraction
                    .injections
                    .push(Injection::new(key, &directives.reference));
                None
            }
            FieldKind::String => Some(PropertySchema::scalar("string", &directives.description)),
            FieldKind::StringMap => Some(PropertySchema::string_map(&directives.description)),
            FieldKind::Array => {
                let items = (!directives.reference.is_empty())
                    .then_some(directives.reference.as_str());
                Some(PropertySchema::array(items, &directives.description))
            }
            FieldKind::Reference => Some(PropertySchema::reference(
                &directives.reference,
                &directives.description,
            )),
        };

        let Some(property) = property else {
            continue;
        };
        let entry = extraction.definitions.entry(key.to_string()).or_default();
        entry.properties.insert(name.clone(), property);
        if !directives.optional && !name.is_empty() {
            entry.required.push(name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_without_key_contributes_nothing() {
        let source = r#"
// Just a helper, embedded elsewhere
type PodSpecMod struct {
    // Name of the pod
    Name string `json:"name"`
}
"#;
        let extraction = generate_definitions(source).unwrap();
        assert!(extraction.definitions.is_empty());
        assert!(extraction.injections.is_empty());
    }

    #[test]
    fn test_optional_field_is_never_required() {
        let source = r#"
// kedgeSpec: io.kedge.AppSpec
type App struct {
    // +optional
    Name string `json:"name"`
    // +optional
    Data map[string]string `json:"data"`
    // +optional
    Ports []int `json:"ports"`
}
"#;
        let extraction = generate_definitions(source).unwrap();
        assert!(extraction.definitions["io.kedge.AppSpec"].required.is_empty());
    }

    #[test]
    fn test_uncommented_field_is_optional() {
        let source = r#"
// kedgeSpec: io.kedge.AppSpec
type App struct {
    Name string `json:"name"`
}
"#;
        let extraction = generate_definitions(source).unwrap();
        assert!(extraction.definitions["io.kedge.AppSpec"].required.is_empty());
    }

    #[test]
    fn test_inline_embedded_name_is_exempt_from_required() {
        let source = r#"
// kedgeSpec: io.kedge.AppSpec
type App struct {
    // this stays commented so the field is not optional
    Unnamed string `json:",omitempty"`
}
"#;
        let extraction = generate_definitions(source).unwrap();
        let app = &extraction.definitions["io.kedge.AppSpec"];
        assert!(app.properties.contains_key(""));
        assert!(app.required.is_empty());
    }

    #[test]
    fn test_tag_failure_aborts_with_field_context() {
        let source = r#"
// kedgeSpec: io.kedge.AppSpec
type App struct {
    Name string `json:"a" yaml:"b"`
}
"#;
        let err = generate_definitions(source).unwrap_err();
        match err {
            ExtractError::Tag { field, message } => {
                assert_eq!(field, "Name");
                assert_eq!(message, "more than one tag found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classification_failure_aborts() {
        let source = r#"
// kedgeSpec: io.kedge.AppSpec
type App struct {
    Data map[string]int `json:"data"`
}
"#;
        let err = generate_definitions(source).unwrap_err();
        assert!(matches!(err, ExtractError::Classification { .. }));
    }

    #[test]
    fn test_embedding_cycle_terminates() {
        let source = r#"
// kedgeSpec: io.kedge.AppSpec
type App struct {
    Mod `json:",inline"`
}

type Mod struct {
    App `json:",inline"`
    // Name of the app
    Name string `json:"name"`
}
"#;
        let extraction = generate_definitions(source).unwrap();
        let app = &extraction.definitions["io.kedge.AppSpec"];
        assert!(app.properties.contains_key("name"));
        assert_eq!(app.required, vec!["name"]);
    }
}
