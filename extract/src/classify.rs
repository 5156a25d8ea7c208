//! Field-type classification over the closed set of declared type forms.

use crate::source::TypeExpr;

/// Semantic kind of a declared field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `string`; emits a scalar string property.
    String,
    /// `map[string]string`; emits a string-map property.
    StringMap,
    /// `[]T`; emits an array property whose element target comes from the
    /// field's comment directive.
    Array,
    /// `*T`; emits a direct-reference property whose target comes from the
    /// comment directive.
    Reference,
    /// `pkg.T`; recorded as an injection instruction, never a property.
    CrossPackage,
    /// Any other bare identifier, a candidate for inline embedding.
    Embedded,
}

/// Classifies a declared type form.
///
/// Unknown forms are rejected explicitly rather than silently defaulted;
/// the returned message is attached to the field by the caller.
pub fn classify(ty: &TypeExpr) -> Result<FieldKind, String> {
    match ty {
        TypeExpr::Named(name) if name == "string" => Ok(FieldKind::String),
        TypeExpr::Named(_) => Ok(FieldKind::Embedded),
        TypeExpr::Map { key, value } => match (key.as_ref(), value.as_ref()) {
            (TypeExpr::Named(key), TypeExpr::Named(value)) => {
                if key == "string" && value == "string" {
                    Ok(FieldKind::StringMap)
                } else {
                    Err("map key and value types must both be string".to_string())
                }
            }
            _ => Err("map key or value is not an identifier".to_string()),
        },
        TypeExpr::Slice(_) => Ok(FieldKind::Array),
        TypeExpr::Qualified { .. } => Ok(FieldKind::CrossPackage),
        TypeExpr::Pointer(_) => Ok(FieldKind::Reference),
        TypeExpr::Unsupported(_) => Err("unrecognized field type".to_string()),
    }
}
