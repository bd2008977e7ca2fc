//! Lenient JSON decoding for hand-written geometry.
//!
//! Authors type GeoJSON directly into pages, so decoding tolerates:
//! - `//` line comments and `/* */` block comments
//! - trailing commas before `]` or `}`
//! - unclosed strings and brackets at the very end of the text
//!
//! Recovery is best-effort. When the repaired text still fails to decode,
//! the error reported is the one produced for the comment-stripped text,
//! which points at the author's actual mistake rather than at a repair.

use serde_json::Value;

use super::error::ParseError;

/// Decode `input`, applying comment stripping and, on failure, repair.
pub fn decode(input: &str) -> Result<Value, ParseError> {
    let stripped = strip_comments(input);
    match serde_json::from_str(&stripped) {
        Ok(value) => Ok(value),
        Err(err) => {
            let repaired = close_brackets(&remove_trailing_commas(&stripped));
            serde_json::from_str(&repaired).map_err(|_| ParseError::Json(err.to_string()))
        }
    }
}

/// Remove `//` and `/* */` comments outside of string literals.
///
/// Line comments keep their terminating newline and block comments become a
/// single space, so line numbers in later decode errors stay accurate for
/// everything but multi-line block comments.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drop commas that are followed (after whitespace) by `]` or `}`.
pub fn remove_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some(']' | '}')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// Close an unterminated trailing string and any brackets left open.
///
/// Only brackets opened and never closed are completed; a mismatched closer
/// is left alone for the decoder to report.
pub fn close_brackets(input: &str) -> String {
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => open.push(']'),
            '{' => open.push('}'),
            ']' | '}' => {
                if open.last() == Some(&c) {
                    open.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = input.trim_end().to_owned();
    if in_string {
        out.push('"');
    }
    out.extend(open.iter().rev());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_plain() {
        let value = decode(r#"{"type":"Feature"}"#).unwrap();
        assert_eq!(value, json!({ "type": "Feature" }));
    }

    #[test]
    fn test_strip_line_and_block_comments() {
        let input = "{\n  // a point\n  \"type\": /* inline */ \"Point\"\n}";
        assert_eq!(decode(input).unwrap(), json!({ "type": "Point" }));
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let input = r#"{"url": "https://example.org/*x*/", "t": "a // b"}"#;
        let value = decode(input).unwrap();
        assert_eq!(value["url"], "https://example.org/*x*/");
        assert_eq!(value["t"], "a // b");
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let input = r#"{"t": "say \"//hi\""}"#;
        assert_eq!(strip_comments(input), input);
    }

    #[test]
    fn test_trailing_commas_are_fixed() {
        let input = r#"[{"type": "Point", "coordinates": [1, 2,],},]"#;
        let value = decode(input).unwrap();
        assert_eq!(value, json!([{ "type": "Point", "coordinates": [1, 2] }]));
    }

    #[test]
    fn test_trailing_comma_inside_string_untouched() {
        assert_eq!(remove_trailing_commas(r#"{"a": ",]"}"#), r#"{"a": ",]"}"#);
    }

    #[test]
    fn test_unclosed_brackets_are_completed() {
        let value = decode(r#"[{"type": "Point", "coordinates": [1, 2"#).unwrap();
        assert_eq!(value, json!([{ "type": "Point", "coordinates": [1, 2] }]));
    }

    #[test]
    fn test_unclosed_string_is_completed() {
        assert_eq!(close_brackets(r#"{"title": "abc"#), r#"{"title": "abc"}"#);
    }

    #[test]
    fn test_unrecoverable_input_reports_original_error() {
        let err = decode("{\"type\": Feature}").unwrap_err();
        match err {
            ParseError::Json(message) => assert!(message.contains("line 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_preserves_key_order() {
        let value = decode(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
