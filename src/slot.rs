use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EditorError, EditorResult};

/// Coarse element category used to address editable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotKind {
    H1,
    H2,
    H3,
    Paragraph,
    Button,
}

impl SlotKind {
    /// All categories, in the order the extractor reports them.
    pub const ALL: [SlotKind; 5] = [
        SlotKind::H1,
        SlotKind::H2,
        SlotKind::H3,
        SlotKind::Paragraph,
        SlotKind::Button,
    ];

    /// Short tag used in the serialized id (`h1`, `p`, `btn`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            SlotKind::H1 => "h1",
            SlotKind::H2 => "h2",
            SlotKind::H3 => "h3",
            SlotKind::Paragraph => "p",
            SlotKind::Button => "btn",
        }
    }

    /// Label prefix shown in the editor side panel.
    pub fn label_prefix(self) -> &'static str {
        match self {
            SlotKind::H1 => "Titre principal",
            SlotKind::H2 => "Sous-titre",
            SlotKind::H3 => "Section",
            SlotKind::Paragraph => "Paragraphe",
            SlotKind::Button => "Bouton",
        }
    }

    pub fn from_tag(tag: &str) -> Option<SlotKind> {
        SlotKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Typed reference to the `index`-th element of a category.
///
/// Only meaningful for the base document it was extracted from. Serialized as
/// `"{tag}-{index}"` (e.g. `h1-0`, `btn-2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextSlot {
    pub kind: SlotKind,
    pub index: usize,
}

impl TextSlot {
    pub fn new(kind: SlotKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Human readable label, 1-based.
    pub fn label(&self) -> String {
        format!("{} {}", self.kind.label_prefix(), self.index + 1)
    }
}

impl fmt::Display for TextSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.tag(), self.index)
    }
}

impl FromStr for TextSlot {
    type Err = EditorError;

    fn from_str(id: &str) -> EditorResult<Self> {
        let invalid = |reason: &str| EditorError::InvalidSlotId {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        let (tag, index) = id
            .rsplit_once('-')
            .ok_or_else(|| invalid("expected '<category>-<index>'"))?;
        let kind = SlotKind::from_tag(tag)
            .ok_or_else(|| invalid("category must be one of h1, h2, h3, p, btn"))?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("index must be a non-negative integer"));
        }
        let index = index
            .parse::<usize>()
            .map_err(|_| invalid("index is out of range"))?;

        Ok(TextSlot { kind, index })
    }
}

impl TryFrom<String> for TextSlot {
    type Error = EditorError;

    fn try_from(value: String) -> EditorResult<Self> {
        value.parse()
    }
}

impl From<TextSlot> for String {
    fn from(slot: TextSlot) -> Self {
        slot.to_string()
    }
}
