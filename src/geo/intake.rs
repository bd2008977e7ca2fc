//! The geometry intake pipeline.
//!
//! ```text
//! raw text ─► decode ─► shape check ─► schema ─► ExternalData ─► sanitize
//!            (lenient)  (object[])     (all      (accumulated)   (strip `_`,
//!                                       errors)                  render text)
//! ```
//!
//! Every consumer of author geometry goes through [`GeometryIntake::parse`],
//! so whichever path processes an embed, it sees the same document and
//! derives the same group id from it.

use serde_json::Value;

use super::error::ParseError;
use super::external::{DataPageResolver, ExternalDataNormalizer};
use super::json;
use super::sanitize::TextSanitizer;
use super::schema::{GeoJsonSchema, SchemaIssue, SchemaValidator};
use crate::config::SiteConfig;
use crate::markup::WikiTextRenderer;

/// A successfully processed geometry document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    /// Validated, normalized and sanitized top-level items
    pub items: Vec<Value>,
    /// Non-fatal schema findings, for diagnostic display
    pub warnings: Vec<SchemaIssue>,
}

pub struct GeometryIntake {
    validator: Box<dyn SchemaValidator>,
    normalizer: ExternalDataNormalizer,
    sanitizer: TextSanitizer,
}

impl GeometryIntake {
    pub fn new(
        validator: Box<dyn SchemaValidator>,
        normalizer: ExternalDataNormalizer,
        sanitizer: TextSanitizer,
    ) -> Self {
        Self {
            validator,
            normalizer,
            sanitizer,
        }
    }

    /// Build the pipeline with the built-in capabilities.
    pub fn from_config(config: &SiteConfig) -> Self {
        let normalizer = ExternalDataNormalizer::new(
            &config.server.map_server,
            &config.server.api_endpoint,
            &config.data.namespace,
            &config.data.content_model,
            Box::new(DataPageResolver),
        );
        let sanitizer = TextSanitizer::new(
            Box::new(WikiTextRenderer::new(&config.sanitize.article_path)),
            config.sanitize.preserve_originals,
        );
        Self::new(Box::new(GeoJsonSchema), normalizer, sanitizer)
    }

    /// Turn raw author text into a sanitized document.
    ///
    /// Missing or blank text is a valid, empty document.
    pub fn parse(&self, raw: Option<&str>) -> Result<Parsed, ParseError> {
        let text = raw.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Ok(Parsed::default());
        }

        let mut items = into_items(json::decode(text)?)?;
        let warnings = self.validator.validate(&items).map_err(ParseError::Schema)?;

        self.normalizer
            .normalize_all(&mut items)
            .map_err(ParseError::InvalidTitle)?;
        for item in &mut items {
            self.sanitizer.sanitize(item);
        }

        Ok(Parsed { items, warnings })
    }
}

/// Wrap a lone object and check every top-level element has a usable `type`.
///
/// Schema validation reports this case too generically to help authors, so it
/// is rejected before validation.
fn into_items(value: Value) -> Result<Vec<Value>, ParseError> {
    let items = match value {
        Value::Object(_) => vec![value],
        Value::Array(items) => items,
        other => {
            return Err(ParseError::Structural(format!(
                "top level is {}",
                json_kind(&other)
            )));
        }
    };

    for (i, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            return Err(ParseError::Structural(format!(
                "item {i} is {}",
                json_kind(item)
            )));
        };
        match obj.get("type").and_then(Value::as_str) {
            Some(t) if !t.is_empty() => {}
            _ => {
                return Err(ParseError::Structural(format!(
                    "item {i} has no \"type\""
                )));
            }
        }
    }

    Ok(items)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
