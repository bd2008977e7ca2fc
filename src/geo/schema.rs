//! Validation of geometry against the GeoJSON + simplestyle schema.
//!
//! [`SchemaValidator`] is the seam the intake pipeline validates through;
//! [`GeoJsonSchema`] is the built-in implementation, backed by the JSON
//! Schema document `geojson.schema.json`. Every violation is collected with
//! a JSON pointer to the offending node, so authors see all problems at once.
//!
//! Keys starting with `_` are accepted anywhere: they are private metadata
//! that sanitization strips right after validation.

use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

use super::item::ItemKind;

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    /// RFC 6901 pointer into the top-level item array (`""` is the array itself)
    pub pointer: String,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    /// Pointer for display; the root renders as `/`.
    pub fn display_pointer(&self) -> &str {
        if self.pointer.is_empty() { "/" } else { &self.pointer }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_pointer(), self.message)
    }
}

/// Validates a decoded item array.
///
/// On success returns non-fatal warnings; on failure every violation found.
pub trait SchemaValidator {
    fn validate(&self, items: &[Value]) -> Result<Vec<SchemaIssue>, Vec<SchemaIssue>>;
}

static GEOJSON_SCHEMA: LazyLock<Validator> = LazyLock::new(|| {
    let schema: Value = serde_json::from_str(include_str!("geojson.schema.json")).unwrap();
    jsonschema::validator_for(&schema).unwrap()
});

/// Built-in GeoJSON + simplestyle validator.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoJsonSchema;

impl SchemaValidator for GeoJsonSchema {
    fn validate(&self, items: &[Value]) -> Result<Vec<SchemaIssue>, Vec<SchemaIssue>> {
        let document = Value::Array(items.to_vec());
        let issues: Vec<SchemaIssue> = GEOJSON_SCHEMA
            .iter_errors(&document)
            .map(|e| SchemaIssue::new(e.instance_path.to_string(), e.to_string()))
            .collect();

        if issues.is_empty() {
            let mut warnings = Vec::new();
            for (i, item) in items.iter().enumerate() {
                crs_warnings(item, &format!("/{i}"), &mut warnings);
            }
            Ok(warnings)
        } else {
            Err(issues)
        }
    }
}

/// `crs` is legal GeoJSON 2008 but ignored here; WGS 84 is always assumed.
fn crs_warnings(item: &Value, ptr: &str, warnings: &mut Vec<SchemaIssue>) {
    if item.get("crs").is_some() {
        warnings.push(SchemaIssue::new(
            format!("{ptr}/crs"),
            "coordinate reference systems are ignored, WGS 84 is assumed",
        ));
    }

    let Some(kind) = ItemKind::of(item) else {
        return;
    };
    if kind == ItemKind::Feature
        && let Some(geometry) = item.get("geometry")
    {
        crs_warnings(geometry, &format!("{ptr}/geometry"), warnings);
    }
    if let Some(key) = kind.children_key()
        && let Some(children) = item.get(key).and_then(Value::as_array)
    {
        for (i, child) in children.iter().enumerate() {
            crs_warnings(child, &format!("{ptr}/{key}/{i}"), warnings);
        }
    }
}
