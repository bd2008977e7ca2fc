//! Recoverable intake errors and their author-facing rendering.
//!
//! Every variant here is shown to the author next to the failing embed.
//! Internal defects (an unknown `ExternalData` service after schema
//! validation, for example) panic instead and never appear in this enum.

use crate::markup::escape_html;
use thiserror::Error;

use super::schema::SchemaIssue;

/// CSS class wrapping every rendered error.
pub const ERROR_CLASS: &str = "mw-kartographer-error";

/// Why a geometry text could not be turned into a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Couldn't parse JSON: {0}")]
    Json(String),

    #[error("GeoJSON must be an object or an array of objects with a non-empty \"type\": {0}")]
    Structural(String),

    #[error("GeoJSON is invalid ({} error{})", .0.len(), if .0.len() == 1 { "" } else { "s" })]
    Schema(Vec<SchemaIssue>),

    #[error("Invalid map data page title: {}", .0.join(", "))]
    InvalidTitle(Vec<String>),
}

impl ParseError {
    /// Render the error as an HTML fragment for display near the embed.
    ///
    /// Schema errors list every issue, not only the first.
    pub fn to_html(&self) -> String {
        let summary = format!("<p>{}</p>", escape_html(&self.to_string()));
        let details = match self {
            Self::Schema(issues) => {
                let items: String = issues
                    .iter()
                    .map(|issue| {
                        format!(
                            "<li><code>{}</code>: {}</li>",
                            escape_html(issue.display_pointer()),
                            escape_html(&issue.message)
                        )
                    })
                    .collect();
                format!("<ul>{items}</ul>")
            }
            _ => String::new(),
        };
        format!("<div class=\"{ERROR_CLASS}\">{summary}{details}</div>")
    }
}

/// Why an embed could not be merged into the page state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Named groups are not enabled on this site (group `{0}`)")]
    NamedGroupsDisabled(String),

    #[error("Invalid group name `{0}`")]
    InvalidGroupName(String),
}

impl EmbedError {
    pub fn to_html(&self) -> String {
        match self {
            Self::Parse(err) => err.to_html(),
            other => format!(
                "<div class=\"{ERROR_CLASS}\"><p>{}</p></div>",
                escape_html(&other.to_string())
            ),
        }
    }
}
