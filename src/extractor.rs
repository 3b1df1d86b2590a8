use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::dom::{self, SlotIndex};
use crate::slot::TextSlot;

/// A piece of text the user can edit in the side panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableDescriptor {
    pub id: TextSlot,
    pub label: String,
    pub original_value: String,
}

/// Scan a base document for editable headings, paragraphs and button labels.
///
/// Descriptors come grouped by category (`h1`, `h2`, `h3`, `p`, `btn`), each group
/// in document order. Never fails: anything that cannot be classified is left out.
pub fn extract(base: &str, config: &EditorConfig) -> Vec<EditableDescriptor> {
    let document = dom::parse_document(base);
    let index = SlotIndex::build(&document, config);

    let descriptors: Vec<EditableDescriptor> = index
        .iter()
        .map(|(slot, element)| EditableDescriptor {
            id: slot,
            label: slot.label(),
            original_value: dom::trimmed_text(element),
        })
        .collect();

    tracing::debug!(count = descriptors.len(), "extracted editable descriptors");
    descriptors
}
