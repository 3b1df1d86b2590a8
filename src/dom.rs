//! Shared HTML tree helpers for the extractor and the compositor.
//!
//! Both sides must resolve editable elements through [`SlotIndex`] so that an id
//! produced by extraction designates the same element at composition time.

use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use std::collections::BTreeMap;
use std::io;

use crate::config::EditorConfig;
use crate::slot::{SlotKind, TextSlot};

pub(crate) type Element = NodeDataRef<ElementData>;

/// Parse a full HTML document. Malformed input is repaired by the parser, never rejected.
pub(crate) fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

pub(crate) fn serialize_document(document: &NodeRef) -> io::Result<String> {
    let mut out = Vec::new();
    document.serialize(&mut out)?;
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub(crate) fn trimmed_text(element: &Element) -> String {
    element.text_contents().trim().to_string()
}

/// Replace every child of `node` with a single text node.
pub(crate) fn replace_text(node: &NodeRef, value: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(value));
}

/// Editable elements of a document, grouped by category in document order.
pub(crate) struct SlotIndex {
    slots: BTreeMap<SlotKind, Vec<Element>>,
}

impl SlotIndex {
    /// Resolve every category up front; later text replacements must not shift indices.
    pub(crate) fn build(document: &NodeRef, config: &EditorConfig) -> Self {
        let slots = SlotKind::ALL
            .into_iter()
            .map(|kind| (kind, collect_kind(document, kind, config)))
            .collect();
        Self { slots }
    }

    pub(crate) fn get(&self, slot: TextSlot) -> Option<&Element> {
        self.slots.get(&slot.kind).and_then(|found| found.get(slot.index))
    }

    /// Iterate `(slot, element)` pairs: categories in [`SlotKind::ALL`] order, then document order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (TextSlot, &Element)> {
        self.slots.iter().flat_map(|(kind, elements)| {
            elements
                .iter()
                .enumerate()
                .map(move |(index, element)| (TextSlot::new(*kind, index), element))
        })
    }
}

fn selector_for(kind: SlotKind, config: &EditorConfig) -> &str {
    match kind {
        SlotKind::H1 => "h1",
        SlotKind::H2 => "h2",
        SlotKind::H3 => "h3",
        SlotKind::Paragraph => "p",
        SlotKind::Button => config.button_selector.as_str(),
    }
}

fn accepts(kind: SlotKind, text_len: usize, config: &EditorConfig) -> bool {
    match kind {
        SlotKind::H1 | SlotKind::H2 | SlotKind::H3 => true,
        SlotKind::Paragraph => {
            (config.paragraph_min_chars..config.paragraph_max_chars).contains(&text_len)
        }
        SlotKind::Button => text_len > 0 && text_len < config.button_max_chars,
    }
}

fn collect_kind(document: &NodeRef, kind: SlotKind, config: &EditorConfig) -> Vec<Element> {
    let selector = selector_for(kind, config);
    let Ok(matches) = document.select(selector) else {
        tracing::warn!(selector, category = kind.tag(), "invalid selector, category skipped");
        return Vec::new();
    };

    let accepted: Vec<Element> = matches
        .filter(|element| {
            let text_len = element.text_contents().trim().chars().count();
            accepts(kind, text_len, config)
        })
        .collect();

    if kind == SlotKind::Button {
        innermost(accepted)
    } else {
        accepted
    }
}

/// Keep one element per control: a match that contains another match is a wrapper,
/// and replacing its text would destroy the inner control.
fn innermost(elements: Vec<Element>) -> Vec<Element> {
    let wrappers: Vec<NodeRef> = elements
        .iter()
        .flat_map(|element| element.as_node().ancestors())
        .filter(|ancestor| elements.iter().any(|other| other.as_node() == ancestor))
        .collect();

    elements
        .into_iter()
        .filter(|element| !wrappers.contains(element.as_node()))
        .collect()
}
