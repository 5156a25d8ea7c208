//! Structured comment directives attached to declarations and fields.
//!
//! A declaration's comment block can name the schema entry it produces; a
//! field's block can mark the field optional or point it at another
//! definition. Every other comment line is free-text description.

/// Marks the line that names a declaration's schema key.
pub const KEY_DIRECTIVE: &str = "kedgeSpec:";

/// Markers for a field's reference target.
pub const REF_DIRECTIVES: [&str; 2] = ["ref:", "k8s:"];

/// Marks a field that documents may omit.
pub const OPTIONAL_MARKER: &str = "+optional";

/// Directives carried by one field's comment block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirectives {
    pub description: String,
    /// Target of a `ref:`/`k8s:` line, when present.
    pub reference: String,
    /// Whether documents may omit the field.
    pub optional: bool,
}

/// Parses a declaration's comment block into `(key, description)`.
///
/// A line starting with [`KEY_DIRECTIVE`] sets the key to the trimmed text
/// after the colon; when several such lines are present the last one wins
/// (long-standing behavior, kept rather than rejected). Every other
/// non-empty line joins the description.
///
/// # Examples
///
/// ```
/// use schemagen_extract::declaration_directives;
///
/// let doc = vec![
///     " An application to deploy".to_string(),
///     " kedgeSpec: io.kedge.AppSpec".to_string(),
/// ];
/// let (key, description) = declaration_directives(&doc);
/// assert_eq!(key, "io.kedge.AppSpec");
/// assert_eq!(description, "An application to deploy");
/// ```
pub fn declaration_directives(doc: &[String]) -> (String, String) {
    let mut key = String::new();
    let mut description = String::new();
    for line in doc {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(KEY_DIRECTIVE) {
            key = rest.trim().to_string();
        } else if !line.is_empty() {
            description.push_str(line);
            description.push(' ');
        }
    }
    (key, description.trim().to_string())
}

/// Parses a field's comment block.
///
/// An absent block means the field is optional: silence must not force
/// callers to supply the field.
///
/// # Examples
///
/// ```
/// use schemagen_extract::field_directives;
///
/// let doc = vec![
///     " List of containers".to_string(),
///     " ref: io.k8s.api.core.v1.Container".to_string(),
///     " +optional".to_string(),
/// ];
/// let directives = field_directives(&doc);
/// assert_eq!(directives.description, "List of containers");
/// assert_eq!(directives.reference, "io.k8s.api.core.v1.Container");
/// assert!(directives.optional);
///
/// assert!(field_directives(&[]).optional);
/// ```
pub fn field_directives(doc: &[String]) -> FieldDirectives {
    if doc.is_empty() {
        return FieldDirectives {
            optional: true,
            ..FieldDirectives::default()
        };
    }

    let mut directives = FieldDirectives::default();
    let mut description = String::new();
    for line in doc {
        let line = line.trim();
        if line.starts_with(OPTIONAL_MARKER) {
            directives.optional = true;
        } else if let Some(rest) = REF_DIRECTIVES
            .iter()
            .find_map(|marker| line.strip_prefix(marker))
        {
            directives.reference = rest.trim().to_string();
        } else if !line.is_empty() {
            description.push_str(line);
            description.push(' ');
        }
    }
    directives.description = description.trim().to_string();
    directives
}
