//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [server] Section Defaults
// ============================================================================

pub mod server {
    pub fn map_server() -> String {
        "https://maps.wikimedia.org".into()
    }

    pub fn api_endpoint() -> String {
        "/w/api.php".into()
    }
}

// ============================================================================
// [sanitize] Section Defaults
// ============================================================================

pub mod sanitize {
    pub fn article_path() -> String {
        "/wiki/".into()
    }
}

// ============================================================================
// [data] Section Defaults
// ============================================================================

pub mod data {
    use crate::geo::external::MAP_DATA_MODEL;

    pub fn namespace() -> String {
        "Data".into()
    }

    pub fn content_model() -> String {
        MAP_DATA_MODEL.into()
    }
}
