//! Schema model for generated and upstream definitions.
//!
//! This module defines the in-memory shape of one schema document: named
//! [`SchemaEntry`] definitions whose properties are [`PropertySchema`]
//! values, plus the [`Injection`] instructions and [`UpstreamEntry`] inputs
//! consumed by the injector. The types are designed for serialization with
//! [`serde`] and emit the same JSON member layout an OpenAPI `definitions`
//! map uses (`type`, `additionalProperties`, `items`, `$ref`).

use std::collections::BTreeMap;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

/// Prefix for local JSON references into the `definitions` map.
pub const REF_PREFIX: &str = "#/definitions/";

/// Generated definitions, keyed by dotted schema key (e.g. `io.kedge.AppSpec`).
///
/// A `BTreeMap` keeps serialization order deterministic (sorted keys).
pub type Definitions = BTreeMap<String, SchemaEntry>;

/// Upstream definitions, keyed the same way but opaque beyond the merged
/// members.
pub type UpstreamDefinitions = BTreeMap<String, UpstreamEntry>;

/// One property of a schema entry.
///
/// Generated properties come in exactly four shapes, one per supported field
/// form; [`Borrowed`](PropertySchema::Borrowed) carries a property copied
/// verbatim from an upstream document by the injector and round-trips
/// untouched.
///
/// # Examples
///
/// ```
/// use schemagen_core::PropertySchema;
///
/// let prop = PropertySchema::scalar("string", "Name of the app");
/// let value = serde_json::to_value(&prop).unwrap();
/// assert_eq!(value["type"], "string");
/// assert_eq!(value["description"], "Name of the app");
///
/// let list = PropertySchema::array(Some("io.kedge.ContainerSpec"), "");
/// let value = serde_json::to_value(&list).unwrap();
/// assert_eq!(value["items"]["$ref"], "#/definitions/io.kedge.ContainerSpec");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySchema {
    /// A bare scalar type, e.g. `{"type": "string"}`.
    Scalar {
        type_name: String,
        description: String,
    },
    /// A string-to-string mapping:
    /// `{"type": "object", "additionalProperties": {"type": "string"}}`.
    StringMap { description: String },
    /// A sequence; `items` names the referenced element definition, when the
    /// schema author annotated one.
    Array {
        items: Option<String>,
        description: String,
    },
    /// A direct reference to another definition. Carries no `type` member of
    /// its own; the reference supersedes it.
    Reference { target: String, description: String },
    /// A property copied verbatim from an upstream document.
    Borrowed(Value),
}

impl PropertySchema {
    /// Creates a scalar property.
    pub fn scalar(type_name: &str, description: &str) -> Self {
        Self::Scalar {
            type_name: type_name.to_string(),
            description: description.to_string(),
        }
    }

    /// Creates a string-to-string map property.
    pub fn string_map(description: &str) -> Self {
        Self::StringMap {
            description: description.to_string(),
        }
    }

    /// Creates an array property, optionally referencing an element
    /// definition.
    pub fn array(items: Option<&str>, description: &str) -> Self {
        Self::Array {
            items: items.map(String::from),
            description: description.to_string(),
        }
    }

    /// Creates a direct-reference property.
    pub fn reference(target: &str, description: &str) -> Self {
        Self::Reference {
            target: target.to_string(),
            description: description.to_string(),
        }
    }

    /// Returns the description, if this property carries one.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar { description, .. }
            | Self::StringMap { description }
            | Self::Array { description, .. }
            | Self::Reference { description, .. } => {
                (!description.is_empty()).then_some(description.as_str())
            }
            Self::Borrowed(value) => value.get("description").and_then(Value::as_str),
        }
    }

    /// Renders the property as its JSON value.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        match self {
            Self::Scalar {
                type_name,
                description,
            } => {
                insert_description(&mut object, description);
                object.insert("type".to_string(), Value::String(type_name.clone()));
            }
            Self::StringMap { description } => {
                insert_description(&mut object, description);
                object.insert("type".to_string(), Value::String("object".to_string()));
                object.insert(
                    "additionalProperties".to_string(),
                    json!({"type": "string"}),
                );
            }
            Self::Array { items, description } => {
                insert_description(&mut object, description);
                object.insert("type".to_string(), Value::String("array".to_string()));
                if let Some(target) = items {
                    object.insert(
                        "items".to_string(),
                        json!({"$ref": format!("{REF_PREFIX}{target}")}),
                    );
                }
            }
            Self::Reference {
                target,
                description,
            } => {
                insert_description(&mut object, description);
                object.insert(
                    "$ref".to_string(),
                    Value::String(format!("{REF_PREFIX}{target}")),
                );
            }
            Self::Borrowed(value) => return value.clone(),
        }
        Value::Object(object)
    }

    /// Reconstructs a property from its JSON value.
    ///
    /// Values that do not match one of the four generated shapes exactly are
    /// preserved as [`Borrowed`](PropertySchema::Borrowed).
    pub fn from_value(value: Value) -> Self {
        let Value::Object(object) = &value else {
            return Self::Borrowed(value);
        };
        let description = object
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let known = |extra: &[&str]| {
            object
                .keys()
                .all(|k| k == "description" || k == "type" || extra.contains(&k.as_str()))
        };

        if let Some(reference) = object.get("$ref").and_then(Value::as_str) {
            if !object.contains_key("type")
                && object.keys().all(|k| k == "description" || k == "$ref")
            {
                if let Some(target) = reference.strip_prefix(REF_PREFIX) {
                    return Self::reference(target, &description);
                }
            }
            return Self::Borrowed(value);
        }

        match object.get("type").and_then(Value::as_str) {
            Some("object") if known(&["additionalProperties"]) => {
                if object.get("additionalProperties") == Some(&json!({"type": "string"})) {
                    return Self::StringMap { description };
                }
            }
            Some("array") if known(&["items"]) => {
                // items must be exactly a local reference, or absent
                let items = object
                    .get("items")
                    .and_then(Value::as_object)
                    .filter(|items| items.len() == 1)
                    .and_then(|items| items.get("$ref"))
                    .and_then(Value::as_str)
                    .and_then(|reference| reference.strip_prefix(REF_PREFIX));
                match (items, object.contains_key("items")) {
                    (Some(target), _) => {
                        return Self::array(Some(target), &description);
                    }
                    (None, false) => {
                        return Self::array(None, &description);
                    }
                    (None, true) => {}
                }
            }
            Some(type_name) if known(&[]) => {
                return Self::scalar(type_name, &description);
            }
            _ => {}
        }
        Self::Borrowed(value)
    }
}

fn insert_description(object: &mut Map<String, Value>, description: &str) {
    if !description.is_empty() {
        object.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }
}

impl Serialize for PropertySchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertySchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(D::Error::custom("property schema must be a JSON object"));
        }
        Ok(Self::from_value(value))
    }
}

/// One named definition in the generated schema model.
///
/// Entries are created by the schema builder and mutated in place only by the
/// injector; `required` may transiently hold duplicates until the injector's
/// set union runs.
///
/// # Examples
///
/// ```
/// use schemagen_core::{PropertySchema, SchemaEntry};
///
/// let entry = SchemaEntry::new("An application")
///     .with_property("name", PropertySchema::scalar("string", ""))
///     .with_required("name");
///
/// assert_eq!(entry.required, vec!["name"]);
/// assert!(entry.properties.contains_key("name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Description from the declaration's comment block.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Properties by external field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertySchema>,
    /// Names of properties a document must supply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl SchemaEntry {
    /// Creates an empty entry with the given description.
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, name: &str, property: PropertySchema) -> Self {
        self.properties.insert(name.to_string(), property);
        self
    }

    /// Marks a property name as required.
    pub fn with_required(mut self, name: &str) -> Self {
        self.required.push(name.to_string());
        self
    }
}

/// A deferred instruction to copy an upstream entry's properties and
/// required-list into a generated entry.
///
/// Recorded by the schema builder whenever a declaration embeds a type from
/// another package; resolved later by [`inject`](crate::inject) against the
/// upstream namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injection {
    /// Key of the generated entry receiving the properties.
    pub target: String,
    /// Key into the upstream namespace the properties come from.
    pub source: String,
}

impl Injection {
    /// Creates an injection instruction.
    pub fn new(target: &str, source: &str) -> Self {
        Self {
            target: target.to_string(),
            source: source.to_string(),
        }
    }
}

/// One definition from an upstream schema document.
///
/// Only `description`, `properties`, and `required` participate in
/// injection; every other member round-trips through `rest` untouched.
///
/// # Examples
///
/// ```
/// use schemagen_core::UpstreamEntry;
///
/// let entry: UpstreamEntry = serde_json::from_value(serde_json::json!({
///     "description": "A widget",
///     "properties": {"size": {"type": "integer", "format": "int32"}},
///     "required": ["size"],
///     "x-kubernetes-group-version-kind": [{"kind": "Widget"}]
/// }))
/// .unwrap();
///
/// assert_eq!(entry.required, vec!["size"]);
/// assert!(entry.rest.contains_key("x-kubernetes-group-version-kind"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Members this tool does not interpret (`type`, vendor extensions, …).
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl From<SchemaEntry> for UpstreamEntry {
    fn from(entry: SchemaEntry) -> Self {
        Self {
            description: entry.description,
            properties: entry
                .properties
                .into_iter()
                .map(|(name, property)| (name, property.to_value()))
                .collect(),
            required: entry.required,
            rest: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_serializes_type_and_description() {
        let value = PropertySchema::scalar("string", "The name").to_value();
        assert_eq!(value, json!({"type": "string", "description": "The name"}));
    }

    #[test]
    fn test_empty_description_is_omitted() {
        let value = PropertySchema::scalar("string", "").to_value();
        assert_eq!(value, json!({"type": "string"}));
    }

    #[test]
    fn test_string_map_shape() {
        let value = PropertySchema::string_map("").to_value();
        assert_eq!(
            value,
            json!({"type": "object", "additionalProperties": {"type": "string"}})
        );
    }

    #[test]
    fn test_array_without_items_omits_items() {
        let value = PropertySchema::array(None, "").to_value();
        assert_eq!(value, json!({"type": "array"}));
    }

    #[test]
    fn test_reference_has_no_type_member() {
        let value = PropertySchema::reference("io.kedge.PodSpec", "spec").to_value();
        assert_eq!(
            value,
            json!({"$ref": "#/definitions/io.kedge.PodSpec", "description": "spec"})
        );
    }

    #[test]
    fn test_generated_shapes_round_trip() {
        let props = [
            PropertySchema::scalar("string", "a"),
            PropertySchema::string_map("b"),
            PropertySchema::array(Some("io.kedge.X"), ""),
            PropertySchema::array(None, "c"),
            PropertySchema::reference("io.kedge.Y", ""),
        ];
        for prop in props {
            let value = serde_json::to_value(&prop).unwrap();
            let back: PropertySchema = serde_json::from_value(value).unwrap();
            assert_eq!(back, prop);
        }
    }

    #[test]
    fn test_unrecognized_shape_stays_borrowed() {
        let upstream = json!({
            "type": "integer",
            "format": "int32",
            "description": "replica count"
        });
        let prop = PropertySchema::from_value(upstream.clone());
        assert_eq!(prop, PropertySchema::Borrowed(upstream.clone()));
        assert_eq!(prop.to_value(), upstream);
    }

    #[test]
    fn test_entry_builder_and_serialization() {
        let entry = SchemaEntry::new("An app")
            .with_property("name", PropertySchema::scalar("string", ""))
            .with_required("name");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "description": "An app",
                "properties": {"name": {"type": "string"}},
                "required": ["name"]
            })
        );
    }

    #[test]
    fn test_upstream_entry_preserves_unknown_members() {
        let raw = json!({
            "properties": {"size": {"type": "integer"}},
            "required": ["size"],
            "type": "object"
        });
        let entry: UpstreamEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_schema_entry_converts_to_upstream_shape() {
        let entry = SchemaEntry::new("desc")
            .with_property("data", PropertySchema::string_map(""))
            .with_required("data");
        let upstream = UpstreamEntry::from(entry);
        assert_eq!(
            upstream.properties["data"],
            json!({"type": "object", "additionalProperties": {"type": "string"}})
        );
        assert_eq!(upstream.required, vec!["data"]);
    }
}
