//! Line-oriented scanner for the annotated declaration grammar.
//!
//! The source unit is a Go-style file used purely as a schema-authoring DSL:
//! `type Name struct { … }` blocks whose declarations and fields carry
//! structured line comments and backtick-quoted serialization tags. The
//! scanner recognizes exactly that grammar: package and import clauses and
//! block comments are skipped, non-struct type aliases are ignored, and any
//! other line is a hard parse error.

use std::collections::HashMap;

use crate::error::{ExtractError, Result};

/// Declared form of a field's type.
///
/// Mirrors the small closed set of type expressions the grammar admits.
/// Anything else scans into [`Unsupported`](TypeExpr::Unsupported) and is
/// rejected later by the classifier, so the error carries field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare identifier, e.g. `string` or `PodSpecMod`.
    Named(String),
    /// A package-qualified identifier, e.g. `api_v1.PodSpec`.
    Qualified { package: String, name: String },
    /// A pointer indirection, e.g. `*ConfigMapEnvSource`.
    Pointer(Box<TypeExpr>),
    /// A sequence, e.g. `[]ServicePortMod`.
    Slice(Box<TypeExpr>),
    /// A mapping, e.g. `map[string]string`.
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Source text that did not match the grammar.
    Unsupported(String),
}

/// One field of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Declared field identifier; `None` for embedded fields.
    pub name: Option<String>,
    pub ty: TypeExpr,
    /// Raw backtick-quoted tag literal, when present.
    pub tag: Option<String>,
    /// Comment lines directly above the field, `//` marker stripped.
    pub doc: Vec<String>,
    /// 1-based source line.
    pub line: usize,
}

impl Field {
    /// Name to report in diagnostics: the declared identifier, or the type
    /// text for embedded fields.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => type_text(&self.ty),
        }
    }
}

/// One `type … struct` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// Comment lines directly above the declaration, `//` marker stripped.
    pub doc: Vec<String>,
    pub fields: Vec<Field>,
    /// 1-based source line of the header.
    pub line: usize,
}

/// A parsed source unit: the declarations in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceUnit {
    pub declarations: Vec<Declaration>,
}

/// Name-to-declaration lookup for resolving inline embedding.
pub type DeclarationIndex<'a> = HashMap<&'a str, &'a Declaration>;

impl SourceUnit {
    /// Scans `source` into declarations.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Declaration`] with the offending 1-based line
    /// number when a line does not match the grammar or a struct block is
    /// left unterminated.
    pub fn parse(source: &str) -> Result<Self> {
        let mut unit = Self::default();
        let mut pending: Vec<String> = Vec::new();
        let mut current: Option<Declaration> = None;
        let mut in_block_comment = false;
        let mut in_import_block = false;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if in_block_comment {
                if line.contains("*/") {
                    in_block_comment = false;
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix("/*") {
                if !rest.contains("*/") {
                    in_block_comment = true;
                }
                continue;
            }
            if in_import_block {
                if line == ")" {
                    in_import_block = false;
                }
                continue;
            }

            if line.is_empty() {
                // a blank line detaches any pending comment block
                pending.clear();
                continue;
            }
            if let Some(comment) = line.strip_prefix("//") {
                pending.push(comment.to_string());
                continue;
            }

            if current.is_some() {
                if line == "}" {
                    unit.declarations.extend(current.take());
                    pending.clear();
                } else {
                    let doc = std::mem::take(&mut pending);
                    let field = parse_field_line(line, line_no, doc)?;
                    if let Some(declaration) = current.as_mut() {
                        declaration.fields.push(field);
                    }
                }
                continue;
            }

            if line.starts_with("package ") {
                pending.clear();
                continue;
            }
            if line == "import (" {
                in_import_block = true;
                pending.clear();
                continue;
            }
            if line.starts_with("import ") {
                pending.clear();
                continue;
            }
            if let Some(rest) = line.strip_prefix("type ") {
                match parse_type_header(rest) {
                    Some(name) => {
                        current = Some(Declaration {
                            name,
                            doc: std::mem::take(&mut pending),
                            fields: Vec::new(),
                            line: line_no,
                        });
                    }
                    // a non-struct type spec never becomes an entry
                    None => pending.clear(),
                }
                continue;
            }
            return Err(ExtractError::Declaration {
                line: line_no,
                message: format!("unrecognized line `{line}`"),
            });
        }

        if let Some(declaration) = current {
            return Err(ExtractError::Declaration {
                line: declaration.line,
                message: format!("declaration `{}` is not terminated", declaration.name),
            });
        }
        Ok(unit)
    }

    /// Builds the name-to-declaration index used to resolve inline
    /// embedding. Built once, before any schema building starts.
    pub fn index(&self) -> DeclarationIndex<'_> {
        self.declarations
            .iter()
            .map(|declaration| (declaration.name.as_str(), declaration))
            .collect()
    }
}

/// Parses the remainder of a `type ` header; returns the struct name, or
/// `None` for non-struct type specs.
fn parse_type_header(rest: &str) -> Option<String> {
    let mut parts = rest.split_whitespace();
    let name = parts.next()?;
    if !is_identifier(name) {
        return None;
    }
    let remainder: Vec<&str> = parts.collect();
    match remainder.as_slice() {
        ["struct", "{"] => Some(name.to_string()),
        ["struct{"] => Some(name.to_string()),
        _ => None,
    }
}

fn parse_field_line(line: &str, line_no: usize, doc: Vec<String>) -> Result<Field> {
    let line = strip_line_comment(line).trim_end();
    let (line, tag) = split_tag(line, line_no)?;

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (name, type_token) = match tokens.as_slice() {
        [type_token] => (None, *type_token),
        [name, type_token] if is_identifier(name) => (Some((*name).to_string()), *type_token),
        _ => {
            return Err(ExtractError::Declaration {
                line: line_no,
                message: format!("could not parse field `{}`", line.trim()),
            });
        }
    };

    Ok(Field {
        name,
        ty: parse_type(type_token),
        tag,
        doc,
        line: line_no,
    })
}

/// Splits a backtick-quoted tag literal off the end of a field line.
fn split_tag(line: &str, line_no: usize) -> Result<(&str, Option<String>)> {
    let Some(start) = line.find('`') else {
        return Ok((line, None));
    };
    let tag = &line[start..];
    if tag.len() < 2 || !tag.ends_with('`') {
        return Err(ExtractError::Declaration {
            line: line_no,
            message: "unterminated tag literal".to_string(),
        });
    }
    Ok((&line[..start], Some(tag.to_string())))
}

/// Drops a trailing line comment, ignoring `//` inside a tag literal.
fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_tag = false;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'`' => in_tag = !in_tag,
            b'/' if !in_tag && bytes.get(i + 1) == Some(&b'/') => {
                return &line[..i];
            }
            _ => {}
        }
    }
    line
}

/// Parses a type token against the closed grammar
/// `T := '*' T | '[]' T | 'map' '[' T ']' T | ident ('.' ident)?`.
///
/// Text outside the grammar yields [`TypeExpr::Unsupported`] rather than an
/// error; rejection happens during classification.
pub fn parse_type(token: &str) -> TypeExpr {
    let mut cursor = TypeCursor { input: token, pos: 0 };
    match cursor.parse() {
        Some(ty) if cursor.at_end() => ty,
        _ => TypeExpr::Unsupported(token.to_string()),
    }
}

struct TypeCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl TypeCursor<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn parse(&mut self) -> Option<TypeExpr> {
        if self.eat("*") {
            return Some(TypeExpr::Pointer(Box::new(self.parse()?)));
        }
        if self.eat("[]") {
            return Some(TypeExpr::Slice(Box::new(self.parse()?)));
        }
        if self.eat("map[") {
            let key = self.parse()?;
            if !self.eat("]") {
                return None;
            }
            let value = self.parse()?;
            return Some(TypeExpr::Map {
                key: Box::new(key),
                value: Box::new(value),
            });
        }
        let first = self.parse_identifier()?;
        if self.eat(".") {
            let name = self.parse_identifier()?;
            return Some(TypeExpr::Qualified {
                package: first,
                name,
            });
        }
        Some(TypeExpr::Named(first))
    }

    fn parse_identifier(&mut self) -> Option<String> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        let ident = &rest[..end];
        if !is_identifier(ident) {
            return None;
        }
        let ident = ident.to_string();
        self.pos += end;
        Some(ident)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Source text of a type expression, for diagnostics.
pub fn type_text(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named(name) => name.clone(),
        TypeExpr::Qualified { package, name } => format!("{package}.{name}"),
        TypeExpr::Pointer(inner) => format!("*{}", type_text(inner)),
        TypeExpr::Slice(inner) => format!("[]{}", type_text(inner)),
        TypeExpr::Map { key, value } => {
            format!("map[{}]{}", type_text(key), type_text(value))
        }
        TypeExpr::Unsupported(text) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_forms() {
        assert_eq!(parse_type("string"), TypeExpr::Named("string".to_string()));
        assert_eq!(
            parse_type("api_v1.PodSpec"),
            TypeExpr::Qualified {
                package: "api_v1".to_string(),
                name: "PodSpec".to_string(),
            }
        );
        assert_eq!(
            parse_type("*ConfigMapEnvSource"),
            TypeExpr::Pointer(Box::new(TypeExpr::Named("ConfigMapEnvSource".to_string())))
        );
        assert_eq!(
            parse_type("[]ServicePortMod"),
            TypeExpr::Slice(Box::new(TypeExpr::Named("ServicePortMod".to_string())))
        );
        assert_eq!(
            parse_type("map[string]string"),
            TypeExpr::Map {
                key: Box::new(TypeExpr::Named("string".to_string())),
                value: Box::new(TypeExpr::Named("string".to_string())),
            }
        );
    }

    #[test]
    fn test_parse_type_nested_forms() {
        assert_eq!(
            parse_type("[]*api_v1.Volume"),
            TypeExpr::Slice(Box::new(TypeExpr::Pointer(Box::new(TypeExpr::Qualified {
                package: "api_v1".to_string(),
                name: "Volume".to_string(),
            }))))
        );
        assert_eq!(
            parse_type("map[string]*Foo"),
            TypeExpr::Map {
                key: Box::new(TypeExpr::Named("string".to_string())),
                value: Box::new(TypeExpr::Pointer(Box::new(TypeExpr::Named(
                    "Foo".to_string()
                )))),
            }
        );
    }

    #[test]
    fn test_parse_type_rejects_garbage() {
        assert_eq!(
            parse_type("func()"),
            TypeExpr::Unsupported("func()".to_string())
        );
        assert_eq!(
            parse_type("map[string"),
            TypeExpr::Unsupported("map[string".to_string())
        );
        assert_eq!(
            parse_type("string]"),
            TypeExpr::Unsupported("string]".to_string())
        );
    }

    #[test]
    fn test_scanner_parses_a_declaration() {
        let source = r#"
package types

import (
    api_v1 "k8s.io/kubernetes/pkg/api/v1"
)

// An app is a description of what to deploy
// kedgeSpec: io.kedge.AppSpec
type App struct {
    // Name of the app
    Name string `json:"name"`
    // +optional
    Data map[string]string `json:"data,omitempty"`
}
"#;
        let unit = SourceUnit::parse(source).unwrap();
        assert_eq!(unit.declarations.len(), 1);

        let app = &unit.declarations[0];
        assert_eq!(app.name, "App");
        assert_eq!(app.doc.len(), 2);
        assert_eq!(app.fields.len(), 2);
        assert_eq!(app.fields[0].name.as_deref(), Some("Name"));
        assert_eq!(app.fields[0].tag.as_deref(), Some("`json:\"name\"`"));
        assert_eq!(app.fields[1].doc, vec![" +optional"]);
    }

    #[test]
    fn test_scanner_parses_embedded_fields() {
        let source = r#"
type AppSpec struct {
    PodSpecMod `json:",inline"`
    api_v1.PodSpec `json:",inline"`
}
"#;
        let unit = SourceUnit::parse(source).unwrap();
        let fields = &unit.declarations[0].fields;
        assert_eq!(fields[0].name, None);
        assert_eq!(fields[0].ty, TypeExpr::Named("PodSpecMod".to_string()));
        assert!(matches!(fields[1].ty, TypeExpr::Qualified { .. }));
    }

    #[test]
    fn test_blank_line_detaches_comments() {
        let source = "// stray comment\n\ntype App struct {\n}\n";
        let unit = SourceUnit::parse(source).unwrap();
        assert!(unit.declarations[0].doc.is_empty());
    }

    #[test]
    fn test_block_comments_and_aliases_are_skipped() {
        let source = r#"
/*
Copyright notice.
*/
package types

type Alias string

type App struct {
}
"#;
        let unit = SourceUnit::parse(source).unwrap();
        assert_eq!(unit.declarations.len(), 1);
        assert_eq!(unit.declarations[0].name, "App");
    }

    #[test]
    fn test_unterminated_declaration_errors() {
        let err = SourceUnit::parse("type App struct {\n    Name string `json:\"name\"`\n")
            .unwrap_err();
        assert!(err.to_string().contains("not terminated"));
    }

    #[test]
    fn test_unrecognized_line_errors_with_line_number() {
        let err = SourceUnit::parse("package types\n\nfunc main() {}\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_trailing_line_comment_is_dropped() {
        let source = "type App struct {\n    Name string `json:\"name\"` // display name\n}\n";
        let unit = SourceUnit::parse(source).unwrap();
        let field = &unit.declarations[0].fields[0];
        assert_eq!(field.name.as_deref(), Some("Name"));
        assert!(field.doc.is_empty());
    }

    #[test]
    fn test_index_maps_names_to_declarations() {
        let source = "type A struct {\n}\ntype B struct {\n}\n";
        let unit = SourceUnit::parse(source).unwrap();
        let index = unit.index();
        assert_eq!(index["A"].name, "A");
        assert_eq!(index["B"].name, "B");
    }
}
