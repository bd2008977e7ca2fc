//! Marker-symbol counters.
//!
//! A marker symbol of `-number…` or `-letter…` is a placeholder: each
//! occurrence is replaced by the next value of a counter keyed by the full
//! symbol string, so `-number-hotels` and `-number-food` count independently.
//! Numbers stop at 99 and letters at `z`; once saturated, every further
//! marker with that key repeats the last value.

use serde_json::Value;
use std::collections::BTreeMap;

use super::item::{children_mut, properties_mut};

/// Counter per literal marker-symbol, shared by every embed of a page.
pub type CounterState = BTreeMap<String, u32>;

const NUMBER_PREFIX: &str = "-number";
const LETTER_PREFIX: &str = "-letter";
const MAX_NUMBER: u32 = 99;
const MAX_LETTER: u32 = 26;

/// The first placeholder marker replaced in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstMarker {
    /// Assigned symbol, e.g. `"3"` or `"c"`
    pub symbol: String,
    /// The marker's properties after assignment
    pub properties: Value,
}

impl FirstMarker {
    /// Text for link captions; letters are shown uppercase.
    pub fn label(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// Replace placeholder marker symbols in `items`, depth-first in document order.
///
/// Returns the first replaced marker found anywhere in the tree.
pub fn assign(items: &mut [Value], counters: &mut CounterState) -> Option<FirstMarker> {
    let mut first = None;

    for item in items.iter_mut() {
        if let Some(marker) = assign_item(item, counters)
            && first.is_none()
        {
            first = Some(marker);
        }

        if let Some(children) = children_mut(item) {
            let nested = assign(children, counters);
            if first.is_none() {
                first = nested;
            }
        }
    }

    first
}

fn assign_item(item: &mut Value, counters: &mut CounterState) -> Option<FirstMarker> {
    let props = properties_mut(item)?;
    let key = props.get("marker-symbol")?.as_str()?;

    let max = if key.starts_with(NUMBER_PREFIX) {
        MAX_NUMBER
    } else if key.starts_with(LETTER_PREFIX) {
        MAX_LETTER
    } else {
        return None;
    };

    let count = counters.entry(key.to_owned()).or_insert(0);
    if *count < max {
        *count += 1;
    }
    let symbol = if max == MAX_NUMBER {
        count.to_string()
    } else {
        letter(*count).to_string()
    };

    props.insert("marker-symbol".into(), Value::String(symbol.clone()));
    Some(FirstMarker {
        symbol,
        properties: Value::Object(props.clone()),
    })
}

/// `1` → `a`, `26` → `z`.
fn letter(count: u32) -> char {
    char::from(b'a' + (count.clamp(1, MAX_LETTER) - 1) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(symbol: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0, 0] },
            "properties": { "marker-symbol": symbol }
        })
    }

    fn symbols(items: &[Value]) -> Vec<String> {
        items
            .iter()
            .map(|item| item["properties"]["marker-symbol"].as_str().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_numbers_saturate_at_99() {
        let mut items: Vec<_> = (0..150).map(|_| feature("-number-x")).collect();
        let mut counters = CounterState::new();
        assign(&mut items, &mut counters);

        let symbols = symbols(&items);
        assert_eq!(symbols[0], "1");
        assert_eq!(symbols[98], "99");
        assert!(symbols[99..].iter().all(|s| s == "99"));
        assert_eq!(counters["-number-x"], 99);
    }

    #[test]
    fn test_letters_saturate_at_z() {
        let mut items: Vec<_> = (0..30).map(|_| feature("-letter-y")).collect();
        let mut counters = CounterState::new();
        assign(&mut items, &mut counters);

        let symbols = symbols(&items);
        assert_eq!(symbols[0], "a");
        assert_eq!(symbols[25], "z");
        assert_eq!(&symbols[26..], ["z", "z", "z", "z"]);
    }

    #[test]
    fn test_keys_count_independently() {
        let mut items = vec![
            feature("-number-a"),
            feature("-number-b"),
            feature("-number-a"),
            feature("-letter"),
            feature("bus"),
        ];
        let mut counters = CounterState::new();
        assign(&mut items, &mut counters);
        assert_eq!(symbols(&items), ["1", "1", "2", "a", "bus"]);
    }

    #[test]
    fn test_counters_continue_across_calls() {
        let mut counters = CounterState::new();
        let mut first = vec![feature("-number"), feature("-number")];
        let mut second = vec![feature("-number"), feature("-letter")];
        assign(&mut first, &mut counters);
        let marker = assign(&mut second, &mut counters).unwrap();
        assert_eq!(symbols(&second), ["3", "a"]);
        assert_eq!(marker.symbol, "3");
    }

    #[test]
    fn test_first_marker_found_in_nested_collection() {
        let mut items = vec![
            feature("park"),
            json!({
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "geometry": null,
                        "properties": { "marker-symbol": "-letter", "title": "Inner" }
                    }
                ]
            }),
            feature("-number"),
        ];
        let mut counters = CounterState::new();
        let marker = assign(&mut items, &mut counters).unwrap();
        assert_eq!(marker.symbol, "a");
        assert_eq!(marker.label(), "A");
        assert_eq!(marker.properties, json!({ "marker-symbol": "a", "title": "Inner" }));
        assert_eq!(items[2]["properties"]["marker-symbol"], "1");
    }

    #[test]
    fn test_geometry_collection_recursion() {
        let mut items = vec![json!({
            "type": "GeometryCollection",
            "geometries": [{ "type": "Point", "coordinates": [0, 0], "properties": { "marker-symbol": "-number" } }]
        })];
        let mut counters = CounterState::new();
        assert!(assign(&mut items, &mut counters).is_some());
        assert_eq!(items[0]["geometries"][0]["properties"]["marker-symbol"], "1");
    }

    #[test]
    fn test_no_placeholders() {
        let mut items = vec![feature("bus"), json!({ "type": "Feature", "geometry": null })];
        let mut counters = CounterState::new();
        assert!(assign(&mut items, &mut counters).is_none());
        assert!(counters.is_empty());
    }
}
