//! Validation of key/value argument arrays
//!
//! Element-creating calls take a flat `[key, value, key, value, ...]`
//! array. Keys must be strings or `T` tokens.

use super::value::{GValue, T};
use crate::error::{GraphError, GraphResult};

/// Check that a key/value array is well formed
pub fn legal_key_values(key_values: &[GValue]) -> GraphResult<()> {
    if key_values.len() % 2 != 0 {
        return Err(GraphError::InvalidArgument(
            "The provided key/value array length must be a multiple of two".to_string(),
        ));
    }

    for key in key_values.iter().step_by(2) {
        match key {
            GValue::Token(_) => {}
            GValue::String(s) if s.is_empty() => {
                return Err(GraphError::InvalidArgument(
                    "Property key can not be empty".to_string(),
                ));
            }
            GValue::String(_) => {}
            other => {
                return Err(GraphError::InvalidArgument(format!(
                    "The provided key/value array must have a String or T on even array indices, found {}",
                    other.type_name()
                )));
            }
        }
    }

    Ok(())
}

/// Identifier supplied in a key/value array, if any
///
/// Both `T::Id` and the plain `"id"` key count as a user supplied identifier.
pub fn id_value(key_values: &[GValue]) -> Option<&GValue> {
    key_values.chunks_exact(2).find_map(|pair| match &pair[0] {
        GValue::Token(T::Id) => Some(&pair[1]),
        GValue::String(s) if s == T::Id.as_str() => Some(&pair[1]),
        _ => None,
    })
}
