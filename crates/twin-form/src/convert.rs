//! Twin ↔ form conversion of map-typed properties.
//!
//! A twin stores a map property as a plain object keyed by data keys. A form
//! stores the same property as an array of `{keyName: k, valueName: v}`
//! records. Both directions work on a copy of the input rooted under the
//! schema title, so a map at the schema root is addressed the same way as a
//! map deeper in the tree.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use twin_path::{find, get, get_mut};

use crate::error::ConvertError;
use crate::locate::locate_maps_with;
use crate::options::ConvertOptions;
use crate::schema::{MapPath, ParsedSchema};

/// Result of [`twin_to_form`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinToForm {
    /// Converted value, or the unconverted input when `error` is set.
    pub form_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ConvertError>,
}

impl TwinToForm {
    pub fn into_result(self) -> Result<Value, ConvertError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.form_data),
        }
    }
}

/// Result of [`form_to_twin`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormToTwin {
    /// Converted value, or the unconverted input when `error` is set.
    pub twin: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ConvertError>,
}

impl FormToTwin {
    pub fn into_result(self) -> Result<Value, ConvertError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.twin),
        }
    }
}

/// Rewrite the map properties of a twin as form record arrays.
///
/// ```
/// use twin_form::{twin_to_form, ParsedSchema};
/// use serde_json::json;
///
/// let schema = ParsedSchema::from_value(json!({
///     "type": "array",
///     "title": "M",
///     "additionalProperties": true,
///     "items": {
///         "type": "object",
///         "required": ["name", "val"],
///         "properties": {"name": {"type": "string"}, "val": {"type": "string"}}
///     }
/// }))
/// .unwrap();
///
/// let out = twin_to_form(&json!({"k1": "foo"}), &schema);
/// assert_eq!(out.form_data, json!([{"name": "k1", "val": "foo"}]));
/// assert!(out.error.is_none());
/// ```
pub fn twin_to_form(twin: &Value, schema: &ParsedSchema) -> TwinToForm {
    if twin.is_null() {
        return TwinToForm {
            form_data: Value::Null,
            error: None,
        };
    }
    MapConverter::new(schema, &ConvertOptions::default()).twin_to_form(twin)
}

/// Rewrite the map record arrays of form data as twin objects.
///
/// When `original_form` is given, keys it held that the new data no longer
/// holds are written as `null` so a twin patch clears them.
pub fn form_to_twin(
    form: &Value,
    schema: &ParsedSchema,
    original_form: Option<&Value>,
) -> FormToTwin {
    if form.is_null() {
        return FormToTwin {
            twin: Value::Null,
            error: None,
        };
    }
    MapConverter::new(schema, &ConvertOptions::default()).form_to_twin(form, original_form)
}

/// Map layout of one schema, located once and reused for every conversion.
#[derive(Debug, Clone)]
pub struct MapConverter {
    root_key: String,
    map_count: usize,
    maps: Result<Vec<MapPath>, ConvertError>,
}

impl MapConverter {
    pub fn new(schema: &ParsedSchema, options: &ConvertOptions) -> Self {
        let map_count = options.count_mode.count(schema);
        let maps = if map_count == 0 {
            Ok(Vec::new())
        } else {
            locate_maps_with(schema, map_count, options.count_mode)
        };
        Self {
            root_key: schema.root_key().to_string(),
            map_count,
            maps,
        }
    }

    /// Number of maps the schema was counted to hold.
    pub fn map_count(&self) -> usize {
        self.map_count
    }

    /// Located maps. May be fewer than [`map_count`](Self::map_count).
    pub fn maps(&self) -> &[MapPath] {
        self.maps.as_deref().unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&ConvertError> {
        self.maps.as_ref().err()
    }

    pub fn twin_to_form(&self, twin: &Value) -> TwinToForm {
        if twin.is_null() || self.map_count == 0 {
            return TwinToForm {
                form_data: twin.clone(),
                error: None,
            };
        }
        let maps = match &self.maps {
            Ok(maps) => maps,
            Err(err) => {
                warn!(error = %err, "twin left unconverted");
                return TwinToForm {
                    form_data: twin.clone(),
                    error: Some(err.clone()),
                };
            }
        };

        let mut root = self.wrap(twin);
        for map in maps {
            match get_mut(&mut root, &map.path) {
                Some(target) => expand_map(map, target),
                None => log_unresolved(&root, map),
            }
        }
        TwinToForm {
            form_data: self.unwrap(root),
            error: None,
        }
    }

    pub fn form_to_twin(&self, form: &Value, original_form: Option<&Value>) -> FormToTwin {
        if form.is_null() || self.map_count == 0 {
            return FormToTwin {
                twin: form.clone(),
                error: None,
            };
        }
        let maps = match &self.maps {
            Ok(maps) => maps,
            Err(err) => {
                warn!(error = %err, "form data left unconverted");
                return FormToTwin {
                    twin: form.clone(),
                    error: Some(err.clone()),
                };
            }
        };

        let mut root = self.wrap(form);
        let original_root = original_form.map(|original| self.wrap(original));
        for map in maps {
            let previous = original_root
                .as_ref()
                .and_then(|original| get(original, &map.path))
                .and_then(Value::as_array);
            match get_mut(&mut root, &map.path) {
                Some(target) => collapse_records(map, target, previous),
                None => log_unresolved(&root, map),
            }
        }
        FormToTwin {
            twin: self.unwrap(root),
            error: None,
        }
    }

    fn wrap(&self, value: &Value) -> Value {
        let mut root = Map::new();
        root.insert(self.root_key.clone(), value.clone());
        Value::Object(root)
    }

    fn unwrap(&self, root: Value) -> Value {
        match root {
            Value::Object(mut map) => map.remove(&self.root_key).unwrap_or(Value::Null),
            other => other,
        }
    }
}

/// Object → record array.
fn expand_map(map: &MapPath, target: &mut Value) {
    let Value::Object(entries) = &mut *target else {
        debug!(path = %map, "map value is not an object, left as is");
        return;
    };
    let records = std::mem::take(entries)
        .into_iter()
        .map(|(key, value)| map.to_record(key, value))
        .collect();
    *target = Value::Array(records);
}

/// Record array → object, with `null` for keys dropped since `previous`.
fn collapse_records(map: &MapPath, target: &mut Value, previous: Option<&Vec<Value>>) {
    let Value::Array(records) = &*target else {
        debug!(path = %map, "map value is not an array, left as is");
        return;
    };
    if records.is_empty() {
        *target = Value::Null;
        return;
    }

    let mut entries = Map::new();
    for record in records {
        match map.read_record(record) {
            Some((key, value)) => {
                entries.insert(key, value.clone());
            }
            None => debug!(path = %map, "incomplete map record skipped"),
        }
    }

    if let Some(previous) = previous.filter(|previous| previous.len() != records.len()) {
        let kept: HashSet<String> = records.iter().filter_map(|r| map.record_key(r)).collect();
        for key in previous.iter().filter_map(|record| map.record_key(record)) {
            if !kept.contains(&key) {
                entries.entry(key).or_insert(Value::Null);
            }
        }
    }

    *target = Value::Object(entries);
}

fn log_unresolved(root: &Value, map: &MapPath) {
    match find(root, &map.path) {
        Ok(slot) if slot.is_vacant() => debug!(path = %map, "map field absent, skipped"),
        Ok(_) => debug!(path = %map, "map field unreachable, skipped"),
        Err(err) => debug!(path = %map, error = %err, "map parent missing, skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device_schema() -> ParsedSchema {
        ParsedSchema::from_value(json!({
            "type": "object",
            "title": "Device",
            "properties": {
                "name": {"type": "string"},
                "labels": {
                    "type": "array",
                    "additionalProperties": true,
                    "items": {
                        "type": "object",
                        "required": ["label", "text"],
                        "properties": {
                            "label": {"type": "string"},
                            "text": {"type": "string"}
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_expand_map_keeps_key_order() {
        let map = MapPath::new(vec![], "k", "v");
        let mut target = json!({"b": 2, "a": 1});
        expand_map(&map, &mut target);
        assert_eq!(target, json!([{"k": "b", "v": 2}, {"k": "a", "v": 1}]));
    }

    #[test]
    fn test_expand_map_ignores_non_object() {
        let map = MapPath::new(vec![], "k", "v");
        let mut target = json!("text");
        expand_map(&map, &mut target);
        assert_eq!(target, json!("text"));
    }

    #[test]
    fn test_collapse_empty_is_null() {
        let map = MapPath::new(vec![], "k", "v");
        let mut target = json!([]);
        collapse_records(&map, &mut target, Some(&vec![json!({"k": "a", "v": 1})]));
        assert_eq!(target, Value::Null);
    }

    #[test]
    fn test_collapse_skips_incomplete_records() {
        let map = MapPath::new(vec![], "k", "v");
        let mut target = json!([
            {"k": "a", "v": 1},
            {"k": "b"},
            {"v": 3},
            "junk",
            {"k": 7, "v": null}
        ]);
        collapse_records(&map, &mut target, None);
        assert_eq!(target, json!({"a": 1, "7": null}));
    }

    #[test]
    fn test_collapse_same_length_adds_no_tombstone() {
        let map = MapPath::new(vec![], "k", "v");
        let previous = vec![json!({"k": "old", "v": 1})];
        let mut target = json!([{"k": "renamed", "v": 1}]);
        collapse_records(&map, &mut target, Some(&previous));
        assert_eq!(target, json!({"renamed": 1}));
    }

    #[test]
    fn test_collapse_incomplete_record_keeps_its_key_alive() {
        let map = MapPath::new(vec![], "k", "v");
        let previous = vec![json!({"k": "a", "v": 1}), json!({"k": "b", "v": 2})];
        let mut target = json!([{"k": "a", "v": 1}, {"k": "b"}, {"k": "c", "v": 3}]);
        collapse_records(&map, &mut target, Some(&previous));
        assert_eq!(target, json!({"a": 1, "c": 3}));
    }

    #[test]
    fn test_converter_reuse_matches_free_functions() {
        let schema = device_schema();
        let converter = MapConverter::new(&schema, &ConvertOptions::default());
        assert_eq!(converter.map_count(), 1);
        assert_eq!(converter.maps().len(), 1);
        assert!(converter.error().is_none());

        let twin = json!({"name": "d1", "labels": {"site": "north", "rack": "7"}});
        let form = converter.twin_to_form(&twin);
        assert_eq!(form, twin_to_form(&twin, &schema));
        assert_eq!(
            form.form_data,
            json!({
                "name": "d1",
                "labels": [
                    {"label": "site", "text": "north"},
                    {"label": "rack", "text": "7"}
                ]
            })
        );

        let back = converter.form_to_twin(&form.form_data, None);
        assert_eq!(back, form_to_twin(&form.form_data, &schema, None));
        assert_eq!(back.twin, twin);
    }

    #[test]
    fn test_missing_map_field_is_skipped() {
        let schema = device_schema();
        let twin = json!({"name": "d1"});
        let out = twin_to_form(&twin, &schema);
        assert_eq!(out.form_data, twin);
        assert!(out.error.is_none());

        let out = form_to_twin(&twin, &schema, None);
        assert_eq!(out.twin, twin);
    }

    #[test]
    fn test_scalar_root_is_skipped() {
        let schema = device_schema();
        let out = twin_to_form(&json!(42), &schema);
        assert_eq!(out.form_data, json!(42));
        assert!(out.error.is_none());
    }

    #[test]
    fn test_outcome_serializes_for_callers() {
        let out = TwinToForm {
            form_data: json!({"a": 1}),
            error: None,
        };
        assert_eq!(serde_json::to_value(&out).unwrap(), json!({"formData": {"a": 1}}));

        let out = FormToTwin {
            twin: json!({"a": 1}),
            error: Some(ConvertError::NestedMapUnsupported {
                path: "/Device".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({
                "twin": {"a": 1},
                "error": {
                    "name": "parseNestedMapNotSupportedException",
                    "message": "nested map at /Device is not supported"
                }
            })
        );
        assert!(out.into_result().is_err());
    }
}
