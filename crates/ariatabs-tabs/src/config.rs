//! Tab list configuration
//!
//! Option names follow the markup-facing contract (`tabListClass`,
//! `onClass`, `hoverableClass`). Missing or empty values fall back to the
//! defaults.

use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_TAB_LIST_CLASS: &str = "tl_list";
pub const DEFAULT_ON_CLASS: &str = "ON";
pub const DEFAULT_HOVERABLE_CLASS: &str = "tl-hoverable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabListConfig {
    /// Class marking tab list containers
    pub tab_list_class: String,
    /// Class marking the initially selected tab; removed during setup
    pub on_class: String,
    /// Class on a container enabling hover-to-activate
    pub hoverable_class: String,
}

impl TabListConfig {
    pub fn new() -> Self {
        Self {
            tab_list_class: DEFAULT_TAB_LIST_CLASS.to_string(),
            on_class: DEFAULT_ON_CLASS.to_string(),
            hoverable_class: DEFAULT_HOVERABLE_CLASS.to_string(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: TabListConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn with_tab_list_class(mut self, class: impl Into<String>) -> Self {
        self.tab_list_class = class.into();
        self
    }

    pub fn with_on_class(mut self, class: impl Into<String>) -> Self {
        self.on_class = class.into();
        self
    }

    pub fn with_hoverable_class(mut self, class: impl Into<String>) -> Self {
        self.hoverable_class = class.into();
        self
    }

    /// Replace blank values with the defaults
    pub fn normalized(mut self) -> Self {
        fill_blank(&mut self.tab_list_class, DEFAULT_TAB_LIST_CLASS);
        fill_blank(&mut self.on_class, DEFAULT_ON_CLASS);
        fill_blank(&mut self.hoverable_class, DEFAULT_HOVERABLE_CLASS);
        self
    }
}

fn fill_blank(value: &mut String, default: &str) {
    let trimmed = value.trim();
    *value = if trimmed.is_empty() { default } else { trimmed }.to_string();
}

impl Default for TabListConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TabListConfig::default();
        assert_eq!(config.tab_list_class, "tl_list");
        assert_eq!(config.on_class, "ON");
        assert_eq!(config.hoverable_class, "tl-hoverable");
    }

    #[test]
    fn test_from_json_partial() {
        let config = TabListConfig::from_json(r#"{"onClass": "is-on"}"#).unwrap();
        assert_eq!(config.on_class, "is-on");
        assert_eq!(config.tab_list_class, DEFAULT_TAB_LIST_CLASS);
    }

    #[test]
    fn test_falsy_values_use_defaults() {
        let config =
            TabListConfig::from_json(r#"{"tabListClass": "", "hoverableClass": "  "}"#).unwrap();
        assert_eq!(config, TabListConfig::default());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(TabListConfig::from_json("{not json").is_err());
    }
}
