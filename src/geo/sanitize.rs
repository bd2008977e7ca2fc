//! Sanitization of validated geometry.
//!
//! Two things happen on every node of the tree:
//! 1. keys starting with `_` are removed before descending, so clients can
//!    never smuggle private metadata through
//! 2. the `title` and `description` of every `properties` object are
//!    rendered to HTML through the injected [`TextRenderer`]
//!
//! With `preserve_originals` the unrendered text is kept under
//! `_orig<field>`; these are the only underscore keys left afterwards.

use serde_json::{Map, Value};

/// Property fields holding author text.
pub const TEXT_FIELDS: [&str; 2] = ["title", "description"];

/// Turns author markup into safe HTML.
pub trait TextRenderer {
    fn render(&self, text: &str) -> String;
}

/// What to do with one text field after rendering.
enum FieldOutcome {
    /// Rendered in place; holds the original text (or language map)
    Rendered(Value),
    /// Unusable value, drop the field and any backup
    Remove,
}

pub struct TextSanitizer {
    renderer: Box<dyn TextRenderer>,
    preserve_originals: bool,
}

impl TextSanitizer {
    pub fn new(renderer: Box<dyn TextRenderer>, preserve_originals: bool) -> Self {
        Self {
            renderer,
            preserve_originals,
        }
    }

    /// Sanitize a tree in place.
    pub fn sanitize(&self, value: &mut Value) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.sanitize(item);
                }
            }
            Value::Object(obj) => {
                obj.retain(|key, _| !key.starts_with('_'));
                for member in obj.values_mut() {
                    self.sanitize(member);
                }
                if let Some(Value::Object(props)) = obj.get_mut("properties") {
                    self.sanitize_properties(props);
                }
            }
            _ => {}
        }
    }

    fn sanitize_properties(&self, props: &mut Map<String, Value>) {
        for field in TEXT_FIELDS {
            let backup_key = format!("_orig{field}");
            let outcome = match props.get_mut(field) {
                None => continue,
                Some(Value::String(text)) if !text.is_empty() => {
                    let original = std::mem::take(text);
                    *text = self.renderer.render(&original);
                    FieldOutcome::Rendered(Value::String(original))
                }
                Some(Value::Object(translations)) => self.render_translations(translations),
                Some(_) => FieldOutcome::Remove,
            };

            match outcome {
                FieldOutcome::Rendered(original) => {
                    if self.preserve_originals {
                        props.insert(backup_key, original);
                    }
                }
                FieldOutcome::Remove => {
                    props.retain(|key, _| key != field && *key != backup_key);
                }
            }
        }
    }

    /// Render a language-code → text map, dropping empty and non-string entries.
    fn render_translations(&self, translations: &mut Map<String, Value>) -> FieldOutcome {
        translations.retain(|_, text| text.as_str().is_some_and(|t| !t.is_empty()));
        if translations.is_empty() {
            return FieldOutcome::Remove;
        }

        let mut originals = Map::new();
        for (lang, text) in translations.iter_mut() {
            if let Value::String(text) = text {
                let original = std::mem::take(text);
                *text = self.renderer.render(&original);
                originals.insert(lang.clone(), Value::String(original));
            }
        }
        FieldOutcome::Rendered(Value::Object(originals))
    }
}
