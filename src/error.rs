use thiserror::Error;

use crate::store::StoreError;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown customization category '{category}'. Expected one of: texts, colors, images")]
    UnknownCategory { category: String },

    #[error("Invalid element id '{id}': {reason}")]
    InvalidSlotId { id: String, reason: String },

    #[error("Unknown color key '{key}'. Expected one of: primary, secondary, accent, background, text")]
    UnknownColorKey { key: String },

    #[error("Invalid color value '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("Invalid selector '{selector}' for '{field}'")]
    InvalidSelector { field: String, selector: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No document loaded: call load() before editing")]
    NoDocument,

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Persistence failed: {0}")]
    Store(#[from] StoreError),
}

impl From<serde_yaml::Error> for EditorError {
    fn from(err: serde_yaml::Error) -> Self {
        EditorError::YamlError(err.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::JsonError(err.to_string())
    }
}
