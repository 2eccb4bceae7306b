//! Conversion errors.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Failure raised while locating the map nodes of a schema.
///
/// Converters never propagate it. They return it next to the unconverted
/// input so the caller can fall back to a raw JSON editor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// A map node's value schema contains another map node.
    #[error("nested map at {path} is not supported")]
    NestedMapUnsupported { path: String },
}

impl ConvertError {
    /// Stable tag of [`ConvertError::NestedMapUnsupported`].
    pub const NESTED_MAP_TAG: &'static str = "parseNestedMapNotSupportedException";

    /// Stable name callers match on to pick a fallback view.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NestedMapUnsupported { .. } => Self::NESTED_MAP_TAG,
        }
    }
}

impl Serialize for ConvertError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ConvertError", 2)?;
        state.serialize_field("name", self.tag())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
