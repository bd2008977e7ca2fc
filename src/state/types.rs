//! Data types produced by the page state.
//!
//! These types are serialized to JSON and handed to the client and to the
//! page categorization step.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Group id → items, in first-merge order.
pub type GroupMap = IndexMap<String, Vec<Value>>;

/// The two kinds of embed a page can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    /// Inline link that opens a full-screen map
    Maplink,
    /// Map frame shown in the page
    Mapframe,
}

/// Page-level signals consumed by the page categorization system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tracking {
    /// Some embed on the page failed
    Broken,
    /// Some embed on the page succeeded
    Valid,
}

/// Everything the client receives once a page is finalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientPayload {
    /// Group data; an empty array means "known to have no data here"
    pub data: GroupMap,
    pub tracking: Vec<Tracking>,
    pub maplinks: u32,
    pub mapframes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embed_kind_serde() {
        assert_eq!(serde_json::to_string(&EmbedKind::Maplink).unwrap(), "\"maplink\"");
        let kind: EmbedKind = serde_json::from_str("\"mapframe\"").unwrap();
        assert_eq!(kind, EmbedKind::Mapframe);
    }

    #[test]
    fn test_payload_serialization_keeps_group_order() {
        let mut data = GroupMap::new();
        data.insert("zeta".into(), vec![json!({ "type": "Feature" })]);
        data.insert("alpha".into(), vec![]);
        let payload = ClientPayload {
            data,
            tracking: vec![Tracking::Valid],
            maplinks: 1,
            mapframes: 0,
        };

        let data = serde_json::to_string(&payload.data).unwrap();
        assert_eq!(data, r#"{"zeta":[{"type":"Feature"}],"alpha":[]}"#);
        let full = serde_json::to_value(&payload).unwrap();
        assert_eq!(full["tracking"], json!(["valid"]));
        assert_eq!(full["maplinks"], 1);
    }
}
