//! Path navigation over `serde_json` values.
//!
//! A path is a sequence of field names (or array indices written as decimal
//! strings) leading from a document root to a nested value. Navigation never
//! panics on a missing segment: lookups return `Option`, and [`find`] returns a
//! [`PathError`] describing where the walk stopped.
//!
//! Paths are displayed as JSON Pointers (RFC 6901).
//!
//! # Example
//!
//! ```
//! use twin_path::{format_pointer, get};
//!
//! let path = vec!["Device".to_string(), "labels".to_string()];
//! assert_eq!(format_pointer(&path), "/Device/labels");
//!
//! let doc = serde_json::json!({"Device": {"labels": {"site": "north"}}});
//! assert_eq!(
//!     get(&doc, &path),
//!     Some(&serde_json::json!({"site": "north"}))
//! );
//! ```

use thiserror::Error;

pub mod find;
pub mod get;

pub use find::{find, Reference};
pub use get::{get, get_mut};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path segment {segment:?} not found")]
    NotFound { segment: String },
    #[error("invalid array index {segment:?}")]
    InvalidIndex { segment: String },
}

/// Format path steps as a pointer string. The root path formats as `""`.
///
/// `~` is written as `~0` and `/` as `~1`.
///
/// ```
/// use twin_path::format_pointer;
///
/// assert_eq!(format_pointer(&[]), "");
/// assert_eq!(format_pointer(&["a/b".to_string(), "c~d".to_string()]), "/a~1b/c~0d");
/// ```
pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for step in path {
        out.push('/');
        for c in step.chars() {
            match c {
                '~' => out.push_str("~0"),
                '/' => out.push_str("~1"),
                _ => out.push(c),
            }
        }
    }
    out
}

/// Parse an array index step. Leading zeros and signs are rejected.
pub(crate) fn parse_index(step: &str) -> Option<usize> {
    let bytes = step.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return None;
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    step.parse().ok()
}
