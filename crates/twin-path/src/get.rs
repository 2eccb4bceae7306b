use serde_json::Value;

use crate::parse_index;

/// Get a value from a JSON document by path.
///
/// Returns `None` when any step does not resolve: a missing key, an index out
/// of bounds or not a valid index, or a scalar where a container was needed.
pub fn get<'a>(val: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Object(map) => map.get(step)?,
            Value::Array(arr) => arr.get(parse_index(step)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to a value in a JSON document by path.
///
/// Same resolution rules as [`get`].
pub fn get_mut<'a>(val: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Object(map) => map.get_mut(step)?,
            Value::Array(arr) => arr.get_mut(parse_index(step)?)?,
            _ => return None,
        };
    }
    Some(current)
}
