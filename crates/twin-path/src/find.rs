use serde_json::Value;

use crate::{parse_index, PathError};

/// The slot a path resolves to: its container, the final key, and the value
/// stored there if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference<'a> {
    /// The value at the path. `None` if the container has no such key.
    pub val: Option<&'a Value>,
    /// The object or array holding the slot. `None` for the root path.
    pub obj: Option<&'a Value>,
    /// Last path step. `None` for the root path.
    pub key: Option<&'a str>,
}

impl Reference<'_> {
    /// True when the container exists but the final key is absent.
    pub fn is_vacant(&self) -> bool {
        self.obj.is_some() && self.val.is_none()
    }
}

/// Resolve a path to its slot.
///
/// Every step but the last must resolve to a container. The last step may
/// be missing, in which case the returned [`Reference`] has `val: None`.
///
/// # Errors
///
/// - [`PathError::NotFound`] when an intermediate step is missing or lands on
///   a scalar.
/// - [`PathError::InvalidIndex`] when an array step is not a decimal index.
///
/// # Example
///
/// ```
/// use twin_path::find;
/// use serde_json::json;
///
/// let doc = json!({"Root": {"map": {"k": 1}}});
/// let other = vec!["Root".to_string(), "other".to_string()];
/// let r = find(&doc, &other).unwrap();
/// assert!(r.is_vacant());
///
/// let missing = vec!["Nope".to_string(), "map".to_string()];
/// assert!(find(&doc, &missing).is_err());
/// ```
pub fn find<'a>(val: &'a Value, path: &'a [String]) -> Result<Reference<'a>, PathError> {
    let Some((last, head)) = path.split_last() else {
        return Ok(Reference {
            val: Some(val),
            obj: None,
            key: None,
        });
    };

    let mut container = val;
    for step in head {
        container = step_into(container, step)?.ok_or_else(|| PathError::NotFound {
            segment: step.clone(),
        })?;
    }

    let slot = step_into(container, last)?;
    Ok(Reference {
        val: slot,
        obj: Some(container),
        key: Some(last.as_str()),
    })
}

fn step_into<'a>(container: &'a Value, step: &str) -> Result<Option<&'a Value>, PathError> {
    match container {
        Value::Object(map) => Ok(map.get(step)),
        Value::Array(arr) => {
            let idx = parse_index(step).ok_or_else(|| PathError::InvalidIndex {
                segment: step.to_string(),
            })?;
            Ok(arr.get(idx))
        }
        _ => Err(PathError::NotFound {
            segment: step.to_string(),
        }),
    }
}
