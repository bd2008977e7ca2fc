//! Read side of stored group data.
//!
//! Group data may pass through storage layers that encode empty JSON objects
//! as empty arrays. These helpers undo that and pick the groups a map widget
//! asks for.

use serde_json::{Map, Value};

use super::types::GroupMap;

/// Keys whose value must be an object whenever it is not `null`.
const OBJECT_KEYS: [&str; 2] = ["geometry", "properties"];

/// Coerce `geometry: []` and `properties: []` back to `{}` at every depth.
fn restore_empty_objects(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            for key in OBJECT_KEYS {
                if let Some(slot) = obj.get_mut(key)
                    && slot.as_array().is_some_and(Vec::is_empty)
                {
                    *slot = Value::Object(Map::new());
                }
            }
            obj.values_mut().for_each(restore_empty_objects);
        }
        Value::Array(items) => items.iter_mut().for_each(restore_empty_objects),
        _ => {}
    }
}

/// Select `ids` from stored group data.
///
/// Unknown ids map to `null`. With no ids, every stored group is returned.
pub fn select_groups(stored: &GroupMap, ids: &[String]) -> Map<String, Value> {
    let mut selected = Map::new();

    if ids.is_empty() {
        for (id, items) in stored {
            selected.insert(id.clone(), group_value(items));
        }
        return selected;
    }

    for id in ids {
        let value = stored.get(id).map(|items| group_value(items)).unwrap_or(Value::Null);
        selected.insert(id.clone(), value);
    }
    selected
}

fn group_value(items: &[Value]) -> Value {
    let mut value = Value::Array(items.to_vec());
    restore_empty_objects(&mut value);
    value
}
