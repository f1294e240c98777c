//! Map conversion for record types

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Convert a record into a string-keyed JSON map.
///
/// Blanket-implemented over [`Serialize`], so every record type gets a
/// `as_map()` with no per-type code. Non-object values are wrapped under a
/// `"value"` key.
pub trait AsMap {
    fn as_map(&self) -> Map<String, Value>;
}

impl<T: Serialize> AsMap for T {
    fn as_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
            Err(err) => {
                warn!("unable to serialize record to a map: {err}");
                Map::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Record {
        name: &'static str,
        count: u32,
    }

    #[test]
    fn test_struct_as_map() {
        let map = Record {
            name: "demo",
            count: 3,
        }
        .as_map();

        assert_eq!(map.get("name"), Some(&Value::from("demo")));
        assert_eq!(map.get("count"), Some(&Value::from(3)));
    }

    #[test]
    fn test_scalar_wrapped_under_value_key() {
        let map = 42u8.as_map();
        assert_eq!(map.get("value"), Some(&Value::from(42)));
    }
}
