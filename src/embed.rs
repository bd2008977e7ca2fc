//! Embed processing.
//!
//! Each map embed on a page runs through [`EmbedProcessor::process`] in
//! document order. An embed is validated completely before it touches the
//! page state, so a failed embed leaves no partial group or counter change
//! behind; it only marks the page broken.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::{SiteConfig, defaults};
use crate::geo::hash::{canonical_encode, hash_group};
use crate::geo::markers::{self, CounterState, FirstMarker};
use crate::geo::{EmbedError, GeometryIntake};
use crate::log;
use crate::state::{EmbedKind, PageState};

/// Valid author-chosen group names.
static GROUP_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w ]+$").unwrap());

// ============================================================================
// Request / Outcome
// ============================================================================

/// One embed as it appears on a page.
///
/// # Example
/// ```toml
/// [[embed]]
/// kind = "mapframe"
/// group = "hotels"
/// show = ["food"]
/// data = '{"type": "Point", "coordinates": [2.35, 48.85]}'
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedRequest {
    pub kind: EmbedKind,

    /// Explicit group name; `None` means a private content-hashed group
    #[serde(default)]
    pub group: Option<String>,

    /// Further groups to display alongside this embed's own
    #[serde(default)]
    pub show: Vec<String>,

    /// Whether a mapframe becomes a live widget. Maplinks always are.
    #[serde(default = "defaults::r#true")]
    pub interactive: bool,

    /// Raw geometry text
    #[serde(default)]
    pub data: Option<String>,
}

impl EmbedRequest {
    fn is_interactive(&self) -> bool {
        match self.kind {
            EmbedKind::Maplink => true,
            EmbedKind::Mapframe => self.interactive,
        }
    }
}

/// What a successful embed contributed to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedOutcome {
    /// Group holding this embed's own items, if it has any or is named
    pub group_id: Option<String>,
    /// Every group this embed displays, own group first
    pub shown_groups: Vec<String>,
    pub first_marker: Option<FirstMarker>,
}

/// Embeds of one page, in document order.
///
/// Read from a TOML file of `[[embed]]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageManifest {
    #[serde(default)]
    pub embed: Vec<EmbedRequest>,
}

impl PageManifest {
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

// ============================================================================
// Processor
// ============================================================================

pub struct EmbedProcessor {
    intake: GeometryIntake,
    named_groups: bool,
}

impl EmbedProcessor {
    pub fn new(intake: GeometryIntake, named_groups: bool) -> Self {
        Self {
            intake,
            named_groups,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(GeometryIntake::from_config(config), config.groups.named)
    }

    pub fn intake(&self) -> &GeometryIntake {
        &self.intake
    }

    /// Process one embed against the page state.
    ///
    /// On error the state is only marked broken; the caller renders
    /// [`EmbedError::to_html`] in place of the map.
    pub fn process(
        &self,
        state: &mut PageState,
        request: &EmbedRequest,
    ) -> Result<EmbedOutcome, EmbedError> {
        state.use_embed(request.kind);

        match self.try_process(state, request) {
            Ok(outcome) => {
                state.mark_valid();
                Ok(outcome)
            }
            Err(err) => {
                log!("error"; "{:?} embed rejected: {}", request.kind, err);
                state.mark_broken();
                Err(err)
            }
        }
    }

    fn try_process(
        &self,
        state: &mut PageState,
        request: &EmbedRequest,
    ) -> Result<EmbedOutcome, EmbedError> {
        if let Some(name) = &request.group {
            self.check_group_name(name)?;
        }
        for name in &request.show {
            self.check_group_name(name)?;
        }

        let parsed = self.intake.parse(request.data.as_deref())?;
        for warning in &parsed.warnings {
            log!("intake"; "warning: {}", warning);
        }
        let mut items = parsed.items;

        let mut counters = state.counters().clone();
        let first_marker = markers::assign(&mut items, &mut counters);
        state.commit_counters(counters);

        let group_id = match &request.group {
            Some(name) => Some(name.clone()),
            None if items.is_empty() => None,
            None => Some(hash_group(&items)),
        };

        let mut shown_groups = Vec::new();
        if let Some(id) = &group_id {
            if !items.is_empty() {
                log!("embed"; "merged {} item(s) into {}", items.len(), id);
                state.merge(id, items);
            }
            shown_groups.push(id.clone());
        }
        for name in &request.show {
            if !shown_groups.contains(name) {
                shown_groups.push(name.clone());
            }
        }

        if request.is_interactive() {
            state.add_interactive_groups(shown_groups.iter().cloned());
        } else {
            state.add_requested_groups(shown_groups.iter().cloned());
        }

        Ok(EmbedOutcome {
            group_id,
            shown_groups,
            first_marker,
        })
    }

    fn check_group_name(&self, name: &str) -> Result<(), EmbedError> {
        if !self.named_groups {
            return Err(EmbedError::NamedGroupsDisabled(name.to_owned()));
        }
        if !GROUP_NAME.is_match(name) {
            return Err(EmbedError::InvalidGroupName(name.to_owned()));
        }
        Ok(())
    }
}

// ============================================================================
// Sanitize-only
// ============================================================================

/// Result of sanitizing geometry outside any page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeResponse {
    /// Author-facing error markup
    Error(String),
    /// Canonical encoding of the sanitized items
    Sanitized(String),
}

/// Run the intake and marker assignment on `text` with fresh counters.
pub fn sanitize_only(intake: &GeometryIntake, text: &str) -> SanitizeResponse {
    match intake.parse(Some(text)) {
        Ok(parsed) => {
            let mut items = parsed.items;
            markers::assign(&mut items, &mut CounterState::new());
            SanitizeResponse::Sanitized(canonical_encode(&items))
        }
        Err(err) => SanitizeResponse::Error(err.to_html()),
    }
}
