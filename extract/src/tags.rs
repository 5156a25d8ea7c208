//! Serialization-tag parsing.
//!
//! A field's external name comes from its backtick-quoted tag, e.g.
//! `` `json:"persistentVolumes,omitempty"` `` names the property
//! `persistentVolumes`. Exactly one tag is considered; option segments after
//! the first comma are discarded.

use std::sync::LazyLock;

use regex::Regex;

static TAG_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z_][A-Za-z0-9_]*):"([^"]*)""#).expect("static regex must compile")
});

static EXTERNAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static regex must compile"));

/// Extracts the external field name from a raw tag literal.
///
/// The empty name (as in `` `json:",inline"` ``) is legal: embedded fields
/// carry no property name of their own.
///
/// # Errors
///
/// Returns a message (the caller attaches field context) when the tag is
/// absent, not backtick-quoted, names more than one tag, or carries a name
/// outside `[A-Za-z0-9._-]`.
pub fn serialization_name(raw: Option<&str>) -> Result<String, String> {
    let Some(raw) = raw else {
        return Err("field has no serialization tag".to_string());
    };
    let inner = raw
        .strip_prefix('`')
        .and_then(|tag| tag.strip_suffix('`'))
        .ok_or_else(|| "tag is not backtick-quoted".to_string())?;

    let mut rest = inner.trim();
    let mut names = Vec::new();
    while !rest.is_empty() {
        let captures = TAG_PAIR
            .captures(rest)
            .ok_or_else(|| format!("could not parse tag `{inner}`"))?;
        let value = &captures[2];
        names.push(value.split(',').next().unwrap_or_default().to_string());
        rest = rest[captures[0].len()..].trim_start();
    }

    match names.as_slice() {
        [] => Err(format!("could not parse tag `{inner}`")),
        [name] => {
            if !name.is_empty() && !EXTERNAL_NAME.is_match(name) {
                return Err(format!("invalid characters in tag name `{name}`"));
            }
            Ok(name.clone())
        }
        _ => Err("more than one tag found".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_with_options() {
        assert_eq!(
            serialization_name(Some("`json:\"persistentVolumes,omitempty\"`")).unwrap(),
            "persistentVolumes"
        );
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(serialization_name(Some("`json:\"name\"`")).unwrap(), "name");
    }

    #[test]
    fn test_inline_tag_yields_empty_name() {
        assert_eq!(serialization_name(Some("`json:\",inline\"`")).unwrap(), "");
    }

    #[test]
    fn test_multiple_tags_error() {
        let err = serialization_name(Some("`json:\"a\" yaml:\"b\"`")).unwrap_err();
        assert_eq!(err, "more than one tag found");
    }

    #[test]
    fn test_missing_tag_errors() {
        assert!(serialization_name(None).unwrap_err().contains("no serialization tag"));
    }

    #[test]
    fn test_unquoted_tag_errors() {
        assert!(serialization_name(Some("json:\"a\"")).is_err());
    }

    #[test]
    fn test_malformed_tag_errors() {
        assert!(serialization_name(Some("`jsonname`")).is_err());
    }

    #[test]
    fn test_invalid_name_characters_error() {
        let err = serialization_name(Some("`json:\"bad name\"`")).unwrap_err();
        assert!(err.contains("invalid characters"));
    }

    #[test]
    fn test_dotted_and_dashed_names_are_accepted() {
        assert_eq!(
            serialization_name(Some("`json:\"app.kubernetes.io-name\"`")).unwrap(),
            "app.kubernetes.io-name"
        );
    }
}
