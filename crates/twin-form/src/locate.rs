//! Locating map nodes in a schema tree.

use tracing::{trace, warn};
use twin_path::format_pointer;

use crate::error::ConvertError;
use crate::options::MapCountMode;
use crate::schema::{MapPath, ParsedSchema};

const MAP_MARKER: &str = "additionalProperties";

/// Count `additionalProperties` occurrences in the serialized schema.
///
/// This is a textual count. It matches the number of map nodes only when the
/// keyword is used for nothing else.
///
/// ```
/// use twin_form::{count_maps, ParsedSchema};
///
/// let schema = ParsedSchema::from_value(serde_json::json!({
///     "type": "object",
///     "title": "Device",
///     "properties": {
///         "labels": {
///             "type": "array",
///             "additionalProperties": true,
///             "items": {"required": ["name", "value"]}
///         }
///     }
/// }))
/// .unwrap();
/// assert_eq!(count_maps(&schema), 1);
/// ```
pub fn count_maps(schema: &ParsedSchema) -> usize {
    serde_json::to_string(schema)
        .map(|text| text.matches(MAP_MARKER).count())
        .unwrap_or(0)
}

/// Count the nodes that satisfy the map node rule, including maps nested
/// inside map items.
pub fn count_maps_structural(schema: &ParsedSchema) -> usize {
    let own = usize::from(schema.is_map());
    let in_items = schema.items.as_deref().map_or(0, count_maps_structural);
    let in_props = schema
        .properties
        .iter()
        .flat_map(|props| props.values())
        .map(count_maps_structural)
        .sum::<usize>();
    own + in_items + in_props
}

/// Find up to `expected` map nodes, counting with the marker heuristic.
///
/// See [`locate_maps_with`].
pub fn locate_maps(
    schema: &ParsedSchema,
    expected: usize,
) -> Result<Vec<MapPath>, ConvertError> {
    locate_maps_with(schema, expected, MapCountMode::Marker)
}

/// Find up to `expected` map nodes.
///
/// The walk starts at the root with path `[title]`. Map nodes are recorded
/// and not descended into; objects are descended into only when `mode`
/// counts at least one map below them. The walk stops as soon as `expected`
/// maps are found. If it runs out of nodes first, the maps found so far are
/// returned.
///
/// # Errors
///
/// [`ConvertError::NestedMapUnsupported`] when a map's item schema counts a
/// map of its own.
pub fn locate_maps_with(
    schema: &ParsedSchema,
    expected: usize,
    mode: MapCountMode,
) -> Result<Vec<MapPath>, ConvertError> {
    let mut found = Vec::new();
    if expected == 0 {
        return Ok(found);
    }

    let mut stack = vec![(schema, vec![schema.root_key().to_string()])];
    while let Some((node, path)) = stack.pop() {
        if let Some((key_name, value_name)) = node.map_fields() {
            if node.items.as_deref().is_some_and(|items| mode.count(items) > 0) {
                let pointer = format_pointer(&path);
                warn!(path = %pointer, "nested map schema is not supported");
                return Err(ConvertError::NestedMapUnsupported { path: pointer });
            }
            let map = MapPath::new(path, key_name, value_name);
            trace!(path = %map, key = key_name, value = value_name, "located map node");
            found.push(map);
            if found.len() == expected {
                break;
            }
            continue;
        }

        let Some(props) = node.properties.as_ref() else {
            continue;
        };
        if !node.is_object() || mode.count(node) == 0 {
            continue;
        }
        // Reversed so siblings pop in declaration order.
        for (name, child) in props.iter().rev() {
            let mut child_path = path.clone();
            child_path.push(name.clone());
            stack.push((child, child_path));
        }
    }

    Ok(found)
}
