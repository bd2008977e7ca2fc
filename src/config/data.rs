//! `[data]` section configuration.
//!
//! Where `page` ExternalData titles are looked up.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[data]` section in mapembed.toml.
///
/// # Example
/// ```toml
/// [data]
/// namespace = "Data"
/// content_model = "Map.JsonConfig"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Namespace holding structured data pages.
    #[serde(default = "defaults::data::namespace")]
    #[educe(Default = defaults::data::namespace())]
    pub namespace: String,

    /// Content model a referenced page must declare.
    #[serde(default = "defaults::data::content_model")]
    #[educe(Default = defaults::data::content_model())]
    pub content_model: String,
}
