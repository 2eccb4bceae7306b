//! Conversion options.

use serde::{Deserialize, Serialize};

use crate::locate::{count_maps, count_maps_structural};
use crate::schema::ParsedSchema;

/// How map nodes are counted before locating them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapCountMode {
    /// Count every `additionalProperties` occurrence in the serialized schema.
    ///
    /// Any other use of the keyword, such as `additionalProperties: false` on
    /// a map's item schema, is counted too.
    #[default]
    Marker,
    /// Count nodes that satisfy the map node rule.
    Structural,
}

impl MapCountMode {
    pub fn count(self, schema: &ParsedSchema) -> usize {
        match self {
            Self::Marker => count_maps(schema),
            Self::Structural => count_maps_structural(schema),
        }
    }
}

/// Options shared by both conversion directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    pub count_mode: MapCountMode,
}

impl ConvertOptions {
    pub fn structural() -> Self {
        Self {
            count_mode: MapCountMode::Structural,
        }
    }
}
