//! Normalization of `ExternalData` nodes.
//!
//! An `ExternalData` node points at geometry served elsewhere. Normalization
//! replaces the author's descriptor (`ids`, `query`, `title`) with the one
//! URL the client should fetch:
//!
//! ```text
//! { "type": "ExternalData", "service": "geoshape", "ids": "Q1, Q2" }
//!   └─► { "type": "ExternalData", "service": "geoshape",
//!         "url": "https://maps.example/geoshape?getgeojson=1&ids=Q1%2CQ2" }
//! ```
//!
//! # URL encoding
//!
//! The URL becomes part of the item and therefore of its group id, so every
//! pipeline that builds these URLs must encode them identically. Keys and
//! values are percent-encoded as RFC 3986 unreserved-only: a space is `%20`
//! (never `+`) and `,` is `%2C`. Pairs keep their fixed order and are joined
//! with `&`.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::item::{ItemKind, Service, children_mut};

/// Content model of map data pages.
pub const MAP_DATA_MODEL: &str = "Map.JsonConfig";
/// Content model of tabular data pages.
pub const TABULAR_DATA_MODEL: &str = "Tabular.JsonConfig";

/// Characters that can never appear in a page title.
const ILLEGAL_TITLE_CHARS: &[char] = &['#', '<', '>', '[', ']', '|', '{', '}'];

static COMMA_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());

/// A page title resolved within a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    /// Normalized title without the namespace, underscores for spaces
    pub db_key: String,
    /// Declared content model of the page
    pub content_model: String,
}

/// Resolves `page` service titles.
pub trait PageResolver {
    fn resolve(&self, title: &str, namespace: &str) -> Option<ResolvedPage>;
}

/// Title resolver for structured data pages.
///
/// Data pages carry their content model in their suffix: `.map` pages hold
/// map data and `.tab` pages hold tables. Anything else is not a data page.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataPageResolver;

impl PageResolver for DataPageResolver {
    fn resolve(&self, title: &str, namespace: &str) -> Option<ResolvedPage> {
        let mut text = title.trim();
        if let Some((prefix, rest)) = text.split_once(':')
            && prefix.trim().eq_ignore_ascii_case(namespace)
        {
            text = rest.trim();
        }
        if text.is_empty() || text.contains(ILLEGAL_TITLE_CHARS) {
            return None;
        }

        let mut chars = text.chars();
        let first = chars.next()?;
        let db_key: String = first
            .to_uppercase()
            .chain(chars)
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();

        let content_model = if db_key.ends_with(".map") {
            MAP_DATA_MODEL
        } else if db_key.ends_with(".tab") {
            TABULAR_DATA_MODEL
        } else {
            return None;
        };

        Some(ResolvedPage {
            db_key,
            content_model: content_model.to_owned(),
        })
    }
}

/// Rewrites `ExternalData` descriptors into `{type, service, url, properties?}`.
pub struct ExternalDataNormalizer {
    map_server: String,
    api_endpoint: String,
    namespace: String,
    content_model: String,
    resolver: Box<dyn PageResolver>,
}

impl ExternalDataNormalizer {
    pub fn new(
        map_server: impl Into<String>,
        api_endpoint: impl Into<String>,
        namespace: impl Into<String>,
        content_model: impl Into<String>,
        resolver: Box<dyn PageResolver>,
    ) -> Self {
        Self {
            map_server: map_server.into(),
            api_endpoint: api_endpoint.into(),
            namespace: namespace.into(),
            content_model: content_model.into(),
            resolver,
        }
    }

    /// Normalize every `ExternalData` node in a tree.
    ///
    /// Only top-level items and the `features`/`geometries` of collections
    /// are visited; objects nested anywhere else are author data and are
    /// left alone. Failures do not stop the walk; the titles of every `page`
    /// node that could not be resolved are returned together.
    pub fn normalize_all(&self, items: &mut [Value]) -> Result<(), Vec<String>> {
        let mut failed = Vec::new();
        self.walk(items, &mut failed);
        if failed.is_empty() { Ok(()) } else { Err(failed) }
    }

    fn walk(&self, items: &mut [Value], failed: &mut Vec<String>) {
        for item in items {
            if ItemKind::of(item) == Some(ItemKind::ExternalData) {
                if let Err(title) = self.normalize(item) {
                    failed.push(title);
                }
            } else if let Some(children) = children_mut(item) {
                self.walk(children, failed);
            }
        }
    }

    /// Normalize one `ExternalData` node in place; other nodes are untouched.
    ///
    /// On failure returns the unresolvable `page` title.
    ///
    /// # Panics
    ///
    /// Panics when `service` is not one of the known services. Schema
    /// validation rejects those, so reaching it is a defect.
    pub fn normalize(&self, item: &mut Value) -> Result<(), String> {
        let Some(obj) = item.as_object() else {
            return Ok(());
        };
        if ItemKind::of(item) != Some(ItemKind::ExternalData) {
            return Ok(());
        }

        let name = obj.get("service").and_then(Value::as_str).unwrap_or_default();
        let Some(service) = Service::from_name(name) else {
            panic!("invariant violation: unexpected ExternalData service {name:?} after validation");
        };

        let url = match service {
            Service::Geoshape | Service::Geopoint | Service::Geoline | Service::Geomask => {
                self.map_server_url(service, obj)
            }
            Service::Page => self.page_url(obj)?,
        };

        let mut normalized = Map::new();
        normalized.insert("type".into(), "ExternalData".into());
        normalized.insert("service".into(), service.as_str().into());
        normalized.insert("url".into(), url.into());
        if let Some(properties) = obj.get("properties") {
            normalized.insert("properties".into(), properties.clone());
        }
        *item = Value::Object(normalized);
        Ok(())
    }

    fn map_server_url(&self, service: Service, obj: &Map<String, Value>) -> String {
        let mut query = vec![("getgeojson", "1".to_owned())];
        if let Some(ids) = obj.get("ids") {
            query.push(("ids", join_ids(ids)));
        }
        if let Some(q) = obj.get("query") {
            query.push(("query", scalar_text(q)));
        }
        format!(
            "{}/{}?{}",
            self.map_server.trim_end_matches('/'),
            service.map_server_path(),
            canonical_query_string(&query)
        )
    }

    fn page_url(&self, obj: &Map<String, Value>) -> Result<String, String> {
        let title = obj.get("title").and_then(Value::as_str).unwrap_or_default();
        let page = self
            .resolver
            .resolve(title, &self.namespace)
            .filter(|page| page.content_model == self.content_model)
            .ok_or_else(|| title.to_owned())?;

        let query = [
            ("format", "json".to_owned()),
            ("formatversion", "2".to_owned()),
            ("action", "jsondata".to_owned()),
            ("title", page.db_key),
        ];
        Ok(format!("{}?{}", self.api_endpoint, canonical_query_string(&query)))
    }
}

/// `ids` as a comma list: arrays are joined, strings lose spacing around commas.
fn join_ids(ids: &Value) -> String {
    match ids {
        Value::Array(parts) => parts.iter().map(scalar_text).collect::<Vec<_>>().join(","),
        Value::String(s) => COMMA_SPACING.replace_all(s, ",").into_owned(),
        other => other.to_string(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encode `key=value` pairs in the given order, percent-encoding both sides.
pub fn canonical_query_string(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
