//! Item classification for GeoJSON + simplestyle trees.
//!
//! Geometry is kept as [`serde_json::Value`] (built with `preserve_order`) so
//! that unknown keys and key order survive every pass untouched. Passes
//! classify a node through [`ItemKind`] and dispatch with an exhaustive match.

use serde_json::{Map, Value};

/// A `type` discriminator recognized by the intake pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Feature,
    FeatureCollection,
    GeometryCollection,
    Geometry(GeometryType),
    ExternalData,
}

/// Plain GeoJSON geometry types (everything but `GeometryCollection`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

impl ItemKind {
    /// Classify a `type` string. Returns `None` for anything unrecognized.
    pub fn from_type(name: &str) -> Option<Self> {
        Some(match name {
            "Feature" => Self::Feature,
            "FeatureCollection" => Self::FeatureCollection,
            "GeometryCollection" => Self::GeometryCollection,
            "ExternalData" => Self::ExternalData,
            "Point" => Self::Geometry(GeometryType::Point),
            "MultiPoint" => Self::Geometry(GeometryType::MultiPoint),
            "LineString" => Self::Geometry(GeometryType::LineString),
            "MultiLineString" => Self::Geometry(GeometryType::MultiLineString),
            "Polygon" => Self::Geometry(GeometryType::Polygon),
            "MultiPolygon" => Self::Geometry(GeometryType::MultiPolygon),
            _ => return None,
        })
    }

    /// Classify a JSON node by its `type` member.
    pub fn of(value: &Value) -> Option<Self> {
        value.get("type").and_then(Value::as_str).and_then(Self::from_type)
    }

    /// Name of the member holding nested items, if this kind has one.
    pub const fn children_key(self) -> Option<&'static str> {
        match self {
            Self::FeatureCollection => Some("features"),
            Self::GeometryCollection => Some("geometries"),
            Self::Feature | Self::Geometry(_) | Self::ExternalData => None,
        }
    }
}

/// Services an `ExternalData` node may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geoshape,
    Geopoint,
    Geoline,
    Geomask,
    Page,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Self::Geoshape,
        Self::Geopoint,
        Self::Geoline,
        Self::Geomask,
        Self::Page,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Geoshape => "geoshape",
            Self::Geopoint => "geopoint",
            Self::Geoline => "geoline",
            Self::Geomask => "geomask",
            Self::Page => "page",
        }
    }

    /// Path segment requested from the map server.
    ///
    /// Masks are served as inverted shapes, so `geomask` asks for `geoshape`.
    pub const fn map_server_path(self) -> &'static str {
        match self {
            Self::Geomask => "geoshape",
            other => other.as_str(),
        }
    }
}

/// Nested items of a collection node, if any.
pub fn children_mut(item: &mut Value) -> Option<&mut Vec<Value>> {
    let key = ItemKind::of(item)?.children_key()?;
    item.get_mut(key).and_then(Value::as_array_mut)
}

/// The `properties` object of a node, if it is an object.
pub fn properties_mut(item: &mut Value) -> Option<&mut Map<String, Value>> {
    item.get_mut("properties").and_then(Value::as_object_mut)
}
