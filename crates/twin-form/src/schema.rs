//! Schema tree and map path types.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use twin_path::format_pointer;

/// Node type of a [`ParsedSchema`].
///
/// Unknown type names, and non-string `type` values such as
/// `["string", "null"]`, are kept as [`SchemaType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Other(Value),
}

impl From<Value> for SchemaType {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("object") => Self::Object,
            Some("array") => Self::Array,
            Some("string") => Self::String,
            Some("number") => Self::Number,
            Some("integer") => Self::Integer,
            Some("boolean") => Self::Boolean,
            _ => Self::Other(value),
        }
    }
}

impl From<SchemaType> for Value {
    fn from(ty: SchemaType) -> Self {
        let name = match ty {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Other(value) => return value,
        };
        Value::String(name.to_string())
    }
}

/// A JSON-Schema-like node.
///
/// A node is a *map node* when `additionalProperties` is `true` and its
/// `items` schema lists at least two `required` fields. The first two name
/// the key and value fields of each form record.
///
/// Fields this crate does not interpret are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, ParsedSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParsedSchema>>,
    /// An explicit `null` is kept as `Some(Value::Null)` so it serializes back.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ParsedSchema {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Key used for this node when it is the root of a conversion.
    pub fn root_key(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// `(keyName, valueName)` if this is a map node.
    pub fn map_fields(&self) -> Option<(&str, &str)> {
        if !matches!(self.additional_properties, Some(Value::Bool(true))) {
            return None;
        }
        match self.items.as_deref()?.required.as_deref()? {
            [key, value, ..] => Some((key.as_str(), value.as_str())),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        self.map_fields().is_some()
    }

    /// True for nodes that may carry `properties`. An untyped node counts.
    pub fn is_object(&self) -> bool {
        matches!(self.schema_type, None | Some(SchemaType::Object))
    }
}

/// Location of one map node, with the field names of its form records.
///
/// `path` starts at the schema title and ends with the map's own field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPath {
    pub path: Vec<String>,
    pub key_name: String,
    pub value_name: String,
}

impl MapPath {
    pub fn new(
        path: Vec<String>,
        key_name: impl Into<String>,
        value_name: impl Into<String>,
    ) -> Self {
        Self {
            path,
            key_name: key_name.into(),
            value_name: value_name.into(),
        }
    }

    /// Build the form record `{keyName: key, valueName: value}`.
    pub fn to_record(&self, key: String, value: Value) -> Value {
        let mut record = Map::new();
        record.insert(self.key_name.clone(), Value::String(key));
        record.insert(self.value_name.clone(), value);
        Value::Object(record)
    }

    /// Key of a form record. Non-string keys are rendered as JSON text;
    /// missing and `null` keys yield `None`.
    pub fn record_key(&self, record: &Value) -> Option<String> {
        match record.as_object()?.get(&self.key_name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Key and value of a form record, or `None` if either field is missing.
    pub fn read_record<'a>(&self, record: &'a Value) -> Option<(String, &'a Value)> {
        let key = self.record_key(record)?;
        let value = record.as_object()?.get(&self.value_name)?;
        Some((key, value))
    }
}

impl fmt::Display for MapPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pointer(&self.path))
    }
}
