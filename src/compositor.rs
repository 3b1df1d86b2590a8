use kuchiki::NodeRef;

use crate::config::EditorConfig;
use crate::dom::{self, Element, SlotIndex};
use crate::palette::ColorPalette;
use crate::snapshot::CustomizationSnapshot;
use crate::stylesheet::color_stylesheet;

/// Re-derive the rendered document from `base` and `snapshot`.
///
/// Pure: `base` is parsed into a fresh tree on every call. Overrides whose target no
/// longer exists are skipped, so a stale snapshot never breaks the output. The result
/// is always a complete document, `<html>` and `<head>` included.
pub fn compose(
    base: &str,
    snapshot: &CustomizationSnapshot,
    original_colors: &ColorPalette,
    config: &EditorConfig,
) -> String {
    let document = dom::parse_document(base);

    apply_texts(&document, snapshot, config);
    if !snapshot.colors.is_empty() {
        let css = color_stylesheet(&snapshot.colors, original_colors, &config.fallback_color);
        inject_style(&document, &config.style_element_id, &css);
    }
    apply_images(&document, snapshot);

    match dom::serialize_document(&document) {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize composed document, returning base");
            base.to_string()
        }
    }
}

fn apply_texts(document: &NodeRef, snapshot: &CustomizationSnapshot, config: &EditorConfig) {
    if snapshot.texts.is_empty() {
        return;
    }

    let index = SlotIndex::build(document, config);
    for (slot, value) in snapshot.texts.iter() {
        match index.get(*slot) {
            Some(element) => dom::replace_text(element.as_node(), value),
            None => tracing::debug!(id = %slot, "text override targets a missing element, skipped"),
        }
    }
}

fn inject_style(document: &NodeRef, element_id: &str, css: &str) {
    let fragment = dom::parse_document(&format!("<style>{}</style>", css));
    let Ok(style) = fragment.select_first("style") else {
        tracing::warn!("generated stylesheet could not be parsed, colors skipped");
        return;
    };
    // Set as an attribute so the serializer escapes it.
    style
        .attributes
        .borrow_mut()
        .insert("id", element_id.to_string());
    let style = style.as_node().clone();
    style.detach();

    match document.select_first("head") {
        Ok(head) => head.as_node().append(style),
        Err(()) => tracing::warn!("document has no <head>, colors skipped"),
    }
}

fn apply_images(document: &NodeRef, snapshot: &CustomizationSnapshot) {
    if snapshot.images.is_empty() {
        return;
    }

    let images: Vec<Element> = match document.select("img") {
        Ok(found) => found.collect(),
        Err(()) => return,
    };
    // Match against the base sources so one replacement cannot redirect another.
    let sources: Vec<Option<String>> = images
        .iter()
        .map(|img| img.attributes.borrow().get("src").map(str::to_string))
        .collect();

    for (selector, src) in snapshot.images.iter() {
        match find_image(&sources, selector) {
            Some(position) => {
                images[position]
                    .attributes
                    .borrow_mut()
                    .insert("src", src.clone());
            }
            None => {
                tracing::debug!(selector = %selector, "image override matches no <img>, skipped")
            }
        }
    }
}

/// First image whose `src` contains `selector`, else the image at position `selector`.
fn find_image(sources: &[Option<String>], selector: &str) -> Option<usize> {
    if selector.is_empty() {
        return None;
    }

    sources
        .iter()
        .position(|src| src.as_deref().is_some_and(|src| src.contains(selector)))
        .or_else(|| leading_integer(selector).filter(|position| *position < sources.len()))
}

/// Integer prefix of `s`, read the way a browser's `parseInt` does. Negative values
/// have no position and yield `None`.
fn leading_integer(s: &str) -> Option<usize> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<usize>().ok()?;
    if negative && value != 0 {
        return None;
    }
    Some(value)
}
