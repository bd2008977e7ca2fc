//! Content hashing for private group ids.
//!
//! Any two pipelines that process the same geometry must derive the same
//! group id from it, since clients key stored data by that id. The id is the
//! SHA-1 of the canonical encoding, hex encoded, prefixed with `_`.
//!
//! The canonical encoding is compact `serde_json` output over
//! `preserve_order` maps:
//! - object keys in the order they were received, never sorted
//! - no whitespace between tokens
//! - `/` left unescaped
//! - non-ASCII characters written as UTF-8, not `\u` escapes

use serde_json::Value;
use sha1::{Digest, Sha1};

/// Prefix marking a group id as content-derived.
pub const PRIVATE_GROUP_PREFIX: char = '_';

/// Serialize items with the canonical encoding.
pub fn canonical_encode(items: &[Value]) -> String {
    // Serializing a `Value` cannot fail: all map keys are strings.
    serde_json::to_string(items).unwrap_or_default()
}

/// Compute the private group id of `items`.
pub fn hash_group(items: &[Value]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(canonical_encode(items).as_bytes());
    let hash = hasher.finalize();
    format!("{PRIVATE_GROUP_PREFIX}{hash:x}")
}
