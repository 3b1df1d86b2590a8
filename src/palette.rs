use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{EditorError, EditorResult};

/// The five color roles a generated website exposes to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKey {
    Primary,
    Secondary,
    Accent,
    Background,
    Text,
}

impl ColorKey {
    pub const ALL: [ColorKey; 5] = [
        ColorKey::Primary,
        ColorKey::Secondary,
        ColorKey::Accent,
        ColorKey::Background,
        ColorKey::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorKey::Primary => "primary",
            ColorKey::Secondary => "secondary",
            ColorKey::Accent => "accent",
            ColorKey::Background => "background",
            ColorKey::Text => "text",
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorKey {
    type Err = EditorError;

    fn from_str(key: &str) -> EditorResult<Self> {
        ColorKey::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| EditorError::UnknownColorKey {
                key: key.to_string(),
            })
    }
}

/// Colors the generated website was built with. Keys may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPalette {
    colors: BTreeMap<ColorKey, String>,
}

impl ColorPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ColorKey, value: impl Into<String>) -> Self {
        self.colors.insert(key, value.into());
        self
    }

    pub fn get(&self, key: ColorKey) -> Option<&str> {
        self.colors.get(&key).map(String::as_str)
    }

    pub fn set(&mut self, key: ColorKey, value: impl Into<String>) {
        self.colors.insert(key, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Load a palette from YAML (`primary: "#112233"` per line).
    pub fn from_yaml(yaml: &str) -> EditorResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Check that a color value is safe to place inside a stylesheet.
///
/// Accepts hex colors, `rgb()`/`rgba()`/`hsl()`/`hsla()` notation and bare named colors.
pub fn validate_color(value: &str) -> EditorResult<()> {
    static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    static FUNCTIONAL_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    static NAMED_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();

    let hex = HEX_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
            .expect("hex color pattern is valid")
    });
    let functional = FUNCTIONAL_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^(?:rgb|rgba|hsl|hsla)\(\s*[0-9.%\s,/+-]+\)$")
            .expect("functional color pattern is valid")
    });
    let named = NAMED_COLOR_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z]{3,32}$").expect("named color pattern is valid"));

    let value = value.trim();
    if hex.is_match(value) || functional.is_match(value) || named.is_match(value) {
        Ok(())
    } else {
        Err(EditorError::InvalidColor {
            value: value.to_string(),
            reason: "must be a hex color (e.g. #ff0000), rgb()/hsl() notation or a named color"
                .to_string(),
        })
    }
}
