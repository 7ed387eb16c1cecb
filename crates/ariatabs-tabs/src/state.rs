//! Tab selection state
//!
//! ```text
//! Deselected ──select──▶ Selected
//!     ▲                     │
//!     └──────deselect───────┘
//! ```
//!
//! Each state maps onto the attribute triple written to the tab and its
//! panel: `aria-selected`, `tabindex`, and the panel's `aria-hidden`.

use serde::{Deserialize, Serialize};

use ariatabs_dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Tab is reachable with Tab-key navigation and its panel is shown
    Selected,
    /// Tab is skipped by sequential navigation and its panel is hidden
    Deselected,
}

impl TabState {
    /// Read the state mirrored into a tab's `aria-selected` attribute
    pub fn of(document: &Document, tab: NodeId) -> Self {
        match document.attribute(tab, "aria-selected") {
            Some("true") => TabState::Selected,
            _ => TabState::Deselected,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, TabState::Selected)
    }

    pub fn aria_selected(&self) -> &'static str {
        match self {
            TabState::Selected => "true",
            TabState::Deselected => "false",
        }
    }

    pub fn tabindex(&self) -> &'static str {
        match self {
            TabState::Selected => "0",
            TabState::Deselected => "-1",
        }
    }

    pub fn panel_hidden(&self) -> &'static str {
        match self {
            TabState::Selected => "false",
            TabState::Deselected => "true",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Selected => "selected",
            TabState::Deselected => "deselected",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "selected" => Ok(TabState::Selected),
            "deselected" => Ok(TabState::Deselected),
            _ => Err(format!("Unknown tab state: {}", s)),
        }
    }
}
