//! Page-scoped storage of map groups.
//!
//! One [`PageState`] lives for one page parse. Every embed is merged into it
//! in document order, and [`PageState::finalize`] turns it into the payload
//! the client receives.
//!
//! # Lifecycle
//!
//! ```text
//! Empty ──use_embed()──► Accumulating ──finalize()──► ClientPayload
//! ```
//!
//! Finalizing consumes the state, so it can happen exactly once.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{ClientPayload, EmbedKind, GroupMap, Tracking};
use crate::geo::markers::CounterState;
use crate::log;

/// Accumulated map data of one page.
///
/// The serialized form is the persisted state handed between pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageState {
    /// Group id → items, append-only
    #[serde(rename = "data")]
    groups: GroupMap,
    /// Marker-symbol counters shared by all embeds
    counters: CounterState,
    /// Groups a live map widget displays
    interactive_groups: IndexSet<String>,
    /// Groups some embed wants shown, in request order
    requested_groups: IndexSet<String>,
    #[serde(rename = "maplinks")]
    maplink_count: u32,
    #[serde(rename = "mapframes")]
    mapframe_count: u32,
    broken: bool,
    valid: bool,
}

impl PageState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more embed of `kind`.
    pub fn use_embed(&mut self, kind: EmbedKind) {
        match kind {
            EmbedKind::Maplink => self.maplink_count += 1,
            EmbedKind::Mapframe => self.mapframe_count += 1,
        }
    }

    /// Append `items` to a group, creating it if needed.
    ///
    /// Items are never deduplicated: merging `[a]` twice yields `[a, a]`.
    pub fn merge(&mut self, group_id: &str, items: Vec<Value>) {
        match self.groups.get_mut(group_id) {
            Some(existing) => existing.extend(items),
            None => {
                self.groups.insert(group_id.to_owned(), items);
            }
        }
    }

    pub fn add_interactive_groups<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interactive_groups.extend(ids.into_iter().map(Into::into));
    }

    pub fn add_requested_groups<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested_groups.extend(ids.into_iter().map(Into::into));
    }

    pub fn counters(&self) -> &CounterState {
        &self.counters
    }

    /// Replace the counters with ones advanced by a successful embed.
    pub fn commit_counters(&mut self, counters: CounterState) {
        self.counters = counters;
    }

    /// Record that an embed on this page failed.
    pub fn mark_broken(&mut self) {
        self.broken = true;
    }

    /// Record that an embed on this page succeeded.
    pub fn mark_valid(&mut self) {
        self.valid = true;
    }

    /// Every merged group, in first-merge order.
    pub fn groups(&self) -> &GroupMap {
        &self.groups
    }

    /// Serialize the state for a later pipeline stage.
    pub fn to_persisted(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Restore a state written by [`to_persisted`](Self::to_persisted).
    pub fn from_persisted(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Decide what the client receives.
    ///
    /// With `emit_all_data` (live previews, where stored data is not yet
    /// available to fetch) every group is sent. Otherwise only interactive
    /// groups are sent, and every requested group without data is sent as an
    /// empty array so the client knows not to fetch it.
    pub fn finalize(self, emit_all_data: bool) -> ClientPayload {
        let mut tracking = Vec::new();
        if self.broken {
            log!("error"; "page has map embeds that failed validation");
            tracking.push(Tracking::Broken);
        }
        if self.valid {
            tracking.push(Tracking::Valid);
        }

        let data = if emit_all_data {
            self.groups
        } else {
            let interactive = &self.interactive_groups;
            let mut data: GroupMap = self
                .groups
                .into_iter()
                .filter(|(id, _)| interactive.contains(id))
                .collect();
            for id in &self.requested_groups {
                if !data.contains_key(id) {
                    data.insert(id.clone(), Vec::new());
                }
            }
            data
        };

        log!(
            "state";
            "finalized {} group(s) from {} maplink(s) and {} mapframe(s)",
            data.len(),
            self.maplink_count,
            self.mapframe_count
        );

        ClientPayload {
            data,
            tracking,
            maplinks: self.maplink_count,
            mapframes: self.mapframe_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_use_embed_counts() {
        let mut state = PageState::new();
        state.use_embed(EmbedKind::Mapframe);
        state.use_embed(EmbedKind::Mapframe);
        state.use_embed(EmbedKind::Maplink);
        assert_eq!(state.mapframe_count, 2);
        assert_eq!(state.maplink_count, 1);
    }

    #[test]
    fn test_merge_appends_without_dedup() {
        let mut state = PageState::new();
        state.merge("g", vec![json!("A")]);
        state.merge("g", vec![json!("B")]);
        state.merge("g", vec![json!("A")]);
        assert_eq!(state.groups()["g"], [json!("A"), json!("B"), json!("A")]);
        assert!(!state.groups().contains_key("other"));
    }

    #[test]
    fn test_group_sets_are_idempotent_and_ordered() {
        let mut state = PageState::new();
        state.add_requested_groups(["b", "a"]);
        state.add_requested_groups(["a", "c", "b"]);
        state.add_interactive_groups(["x"]);
        state.add_interactive_groups(["x"]);

        assert_eq!(state.requested_groups.iter().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(state.interactive_groups.len(), 1);
    }

    #[test]
    fn test_finalize_back_fills_requested_groups() {
        let x = json!({ "type": "Feature", "geometry": null });
        let mut state = PageState::new();
        state.merge("g1", vec![x.clone()]);
        state.add_interactive_groups(["g1"]);
        state.add_requested_groups(["g1", "g2"]);

        let payload = state.finalize(false);
        let data = serde_json::to_string(&payload.data).unwrap();
        assert_eq!(data, format!(r#"{{"g1":[{x}],"g2":[]}}"#));
    }

    #[test]
    fn test_finalize_drops_non_interactive_data() {
        let mut state = PageState::new();
        state.merge("shown", vec![json!(1)]);
        state.merge("static", vec![json!(2)]);
        state.add_interactive_groups(["shown"]);
        state.add_requested_groups(["static"]);

        let payload = state.finalize(false);
        assert_eq!(payload.data["shown"], [json!(1)]);
        assert!(payload.data["static"].is_empty());
    }

    #[test]
    fn test_finalize_emit_all_data() {
        let mut state = PageState::new();
        state.merge("a", vec![json!(1)]);
        state.merge("b", vec![json!(2)]);
        state.add_requested_groups(["c"]);

        let payload = state.finalize(true);
        assert_eq!(payload.data.keys().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_finalize_tracking_signals() {
        let mut state = PageState::new();
        assert!(state.clone().finalize(false).tracking.is_empty());

        state.mark_broken();
        state.mark_valid();
        let payload = state.finalize(false);
        assert_eq!(payload.tracking, [Tracking::Broken, Tracking::Valid]);
    }

    #[test]
    fn test_persisted_round_trip() {
        let mut state = PageState::new();
        state.use_embed(EmbedKind::Mapframe);
        state.merge("_abc", vec![json!({ "type": "Point", "coordinates": [1, 2] })]);
        state.add_requested_groups(["_abc"]);
        let mut counters = CounterState::new();
        counters.insert("-number".into(), 3);
        state.commit_counters(counters);
        state.mark_valid();

        let json = state.to_persisted();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mapframes"], 1);
        assert_eq!(value["requestedGroups"], json!(["_abc"]));
        assert_eq!(value["counters"], json!({ "-number": 3 }));

        let restored = PageState::from_persisted(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_from_persisted_tolerates_missing_fields() {
        let state = PageState::from_persisted(r#"{"broken": true}"#).unwrap();
        assert!(state.broken);
        assert!(!state.valid);
        assert_eq!(state.maplink_count + state.mapframe_count, 0);
    }
}
