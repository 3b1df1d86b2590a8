//! Editor tuning knobs, loadable from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EditorError, EditorResult};
use crate::palette::validate_color;

/// Clickable elements styled or behaving like buttons in generated sites.
/// Wrappers such as `div.btn-group` are not clickable and stay out.
pub const DEFAULT_BUTTON_SELECTOR: &str =
    "button, a.btn, a.button, a[class*=\"btn\"], [role=\"button\"]";

/// Used only when a color has neither an override nor an original value.
pub const DEFAULT_FALLBACK_COLOR: &str = "#007AFF";

pub const DEFAULT_STYLE_ELEMENT_ID: &str = "iwasp-customizations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EditorConfig {
    /// Inclusive lower bound on trimmed paragraph length, in characters.
    pub paragraph_min_chars: usize,
    /// Exclusive upper bound on trimmed paragraph length, in characters.
    pub paragraph_max_chars: usize,
    /// Exclusive upper bound on trimmed button label length, in characters.
    pub button_max_chars: usize,
    /// CSS selector list matching button-like elements.
    pub button_selector: String,
    pub fallback_color: String,
    /// `id` attribute of the injected `<style>` element.
    pub style_element_id: String,
    /// Maximum number of snapshots kept in history. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            paragraph_min_chars: 20,
            paragraph_max_chars: 500,
            button_max_chars: 50,
            button_selector: DEFAULT_BUTTON_SELECTOR.to_string(),
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
            style_element_id: DEFAULT_STYLE_ELEMENT_ID.to_string(),
            history_limit: None,
        }
    }
}

impl EditorConfig {
    pub fn from_yaml(yaml: &str) -> EditorResult<Self> {
        let config: EditorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> EditorResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> EditorResult<()> {
        if self.paragraph_min_chars >= self.paragraph_max_chars {
            return Err(EditorError::InvalidConfig(format!(
                "paragraph_min_chars ({}) must be lower than paragraph_max_chars ({})",
                self.paragraph_min_chars, self.paragraph_max_chars
            )));
        }
        if self.button_max_chars < 2 {
            return Err(EditorError::InvalidConfig(
                "button_max_chars must be at least 2".to_string(),
            ));
        }
        if kuchiki::Selectors::compile(&self.button_selector).is_err() {
            return Err(EditorError::InvalidSelector {
                field: "button_selector".to_string(),
                selector: self.button_selector.clone(),
            });
        }
        validate_color(&self.fallback_color)?;
        if self.style_element_id.is_empty()
            || !self
                .style_element_id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(EditorError::InvalidConfig(format!(
                "style_element_id '{}' must be a non-empty [A-Za-z0-9_-] identifier",
                self.style_element_id
            )));
        }
        if self.history_limit == Some(0) {
            return Err(EditorError::InvalidConfig(
                "history_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EditorConfig::from_yaml("button_max_chars: 30\nhistory_limit: 50\n").unwrap();
        assert_eq!(config.button_max_chars, 30);
        assert_eq!(config.history_limit, Some(50));
        assert_eq!(config.paragraph_min_chars, 20);
        assert_eq!(config.fallback_color, "#007AFF");
    }

    #[test]
    fn test_rejects_inverted_paragraph_bounds() {
        let err = EditorConfig::from_yaml("paragraph_min_chars: 600").unwrap_err();
        assert!(matches!(err, EditorError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_invalid_button_selector() {
        let err = EditorConfig::from_yaml("button_selector: \"a[[\"").unwrap_err();
        assert!(matches!(err, EditorError::InvalidSelector { .. }));
    }

    #[test]
    fn test_rejects_unsafe_fallback_color() {
        let err = EditorConfig::from_yaml("fallback_color: \"red}\"").unwrap_err();
        assert!(matches!(err, EditorError::InvalidColor { .. }));
    }
}
