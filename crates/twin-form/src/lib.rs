//! Map conversion between device twins and schema-driven form data.
//!
//! Schema-driven form renderers cannot display objects whose property names
//! are data. A schema marks such a *map* property with
//! `additionalProperties: true` and an `items` schema whose first two
//! `required` fields name the key and the value of each entry. This crate
//! rewrites those properties in both directions:
//!
//! - [`twin_to_form`]: `{"k1": "foo"}` → `[{"name": "k1", "val": "foo"}]`
//! - [`form_to_twin`]: the inverse, writing `null` for entries the user
//!   removed so a twin patch clears them.
//!
//! A map whose value schema contains another map is not supported. Both
//! directions then return the input unchanged together with
//! [`ConvertError::NestedMapUnsupported`].
//!
//! ```
//! use twin_form::{form_to_twin, twin_to_form, ParsedSchema};
//! use serde_json::json;
//!
//! let schema = ParsedSchema::from_value(json!({
//!     "type": "object",
//!     "title": "Device",
//!     "properties": {
//!         "labels": {
//!             "type": "array",
//!             "additionalProperties": true,
//!             "items": {
//!                 "type": "object",
//!                 "required": ["name", "value"],
//!                 "properties": {"name": {"type": "string"}, "value": {"type": "string"}}
//!             }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let twin = json!({"labels": {"site": "north", "rack": "7"}});
//! let form = twin_to_form(&twin, &schema).form_data;
//!
//! // The user deletes the "rack" label.
//! let edited = json!({"labels": [{"name": "site", "value": "north"}]});
//! let patch = form_to_twin(&edited, &schema, Some(&form)).twin;
//! assert_eq!(patch, json!({"labels": {"site": "north", "rack": null}}));
//! ```

pub mod convert;
pub mod error;
pub mod locate;
pub mod options;
pub mod schema;

pub use convert::{form_to_twin, twin_to_form, FormToTwin, MapConverter, TwinToForm};
pub use error::ConvertError;
pub use locate::{count_maps, count_maps_structural, locate_maps, locate_maps_with};
pub use options::{ConvertOptions, MapCountMode};
pub use schema::{MapPath, ParsedSchema, SchemaType};
