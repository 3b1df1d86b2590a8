use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{EditorError, EditorResult};
use crate::palette::ColorKey;
use crate::slot::TextSlot;

/// Which override map an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Texts,
    Colors,
    Images,
}

impl FromStr for Category {
    type Err = EditorError;

    fn from_str(category: &str) -> EditorResult<Self> {
        match category {
            "texts" => Ok(Category::Texts),
            "colors" => Ok(Category::Colors),
            "images" => Ok(Category::Images),
            _ => Err(EditorError::UnknownCategory {
                category: category.to_string(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Texts => "texts",
            Category::Colors => "colors",
            Category::Images => "images",
        })
    }
}

/// A single override, typed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Text(TextSlot, String),
    Color(ColorKey, String),
    /// Image selector (src substring or position) and the new `src`.
    Image(String, String),
}

impl Edit {
    /// Build an edit from the string triple used at the UI boundary.
    pub fn parse(category: &str, key: &str, value: impl Into<String>) -> EditorResult<Self> {
        let value = value.into();
        Ok(match category.parse::<Category>()? {
            Category::Texts => Edit::Text(key.parse()?, value),
            Category::Colors => Edit::Color(key.parse()?, value),
            Category::Images => Edit::Image(key.to_string(), value),
        })
    }

    pub fn category(&self) -> Category {
        match self {
            Edit::Text(..) => Category::Texts,
            Edit::Color(..) => Category::Colors,
            Edit::Image(..) => Category::Images,
        }
    }
}

/// Every user override at one point in time.
///
/// The three maps sit behind `Arc`s: cloning a snapshot is cheap and an edit only
/// copies the map it touches, so history entries share untouched maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizationSnapshot {
    pub texts: Arc<BTreeMap<TextSlot, String>>,
    pub colors: Arc<BTreeMap<ColorKey, String>>,
    pub images: Arc<BTreeMap<String, String>>,
}

impl CustomizationSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.colors.is_empty() && self.images.is_empty()
    }

    /// Return a new snapshot with `edit` applied. `self` is left untouched.
    pub fn with_edit(&self, edit: Edit) -> Self {
        let mut next = self.clone();
        match edit {
            Edit::Text(slot, value) => {
                Arc::make_mut(&mut next.texts).insert(slot, value);
            }
            Edit::Color(key, value) => {
                Arc::make_mut(&mut next.colors).insert(key, value);
            }
            Edit::Image(selector, src) => {
                Arc::make_mut(&mut next.images).insert(selector, src);
            }
        }
        next
    }

    pub fn text(&self, slot: TextSlot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }

    pub fn color(&self, key: ColorKey) -> Option<&str> {
        self.colors.get(&key).map(String::as_str)
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
