//! Stylesheet generated for color overrides.
//!
//! Generated sites come from templates the editor knows nothing about, so the rules
//! target conventional selectors with `!important`. This is an approximation, not a
//! theme engine: elements outside these conventions keep their original colors.

use std::collections::BTreeMap;

use crate::config::DEFAULT_FALLBACK_COLOR;
use crate::palette::{ColorKey, ColorPalette, validate_color};

/// Broad-brush rules per color role: `(selector list, properties)`.
const PRIMARY_RULES: &[(&str, &[&str])] = &[
    (
        "button, .btn, a.btn, [class*=\"btn-primary\"], .bg-primary",
        &["background-color", "border-color"],
    ),
    (".text-primary", &["color"]),
];
const SECONDARY_RULES: &[(&str, &[&str])] = &[
    (".bg-secondary, [class*=\"btn-secondary\"]", &["background-color"]),
    (".text-secondary", &["color"]),
];
const ACCENT_RULES: &[(&str, &[&str])] = &[
    ("a:not(.btn)", &["color"]),
    (".bg-accent", &["background-color"]),
    (".text-accent", &["color"]),
];
const BACKGROUND_RULES: &[(&str, &[&str])] = &[("body, .bg-background", &["background-color"])];
const TEXT_RULES: &[(&str, &[&str])] = &[("body, h1, h2, h3, p", &["color"])];

fn rules_for(key: ColorKey) -> &'static [(&'static str, &'static [&'static str])] {
    match key {
        ColorKey::Primary => PRIMARY_RULES,
        ColorKey::Secondary => SECONDARY_RULES,
        ColorKey::Accent => ACCENT_RULES,
        ColorKey::Background => BACKGROUND_RULES,
        ColorKey::Text => TEXT_RULES,
    }
}

/// Resolve a role: a valid override wins, then a valid original color.
pub fn resolve_color<'a>(
    key: ColorKey,
    overrides: &'a BTreeMap<ColorKey, String>,
    original: &'a ColorPalette,
) -> Option<&'a str> {
    let from_override = overrides.get(&key).map(String::as_str).filter(|value| {
        let ok = validate_color(value).is_ok();
        if !ok {
            tracing::warn!(key = %key, value, "ignoring invalid color override");
        }
        ok
    });

    from_override.or_else(|| {
        original.get(key).filter(|value| {
            let ok = validate_color(value).is_ok();
            if !ok {
                tracing::warn!(key = %key, value, "ignoring invalid original color");
            }
            ok
        })
    })
}

/// Build the CSS injected for `overrides`.
///
/// Custom properties are declared for every role that resolves. Rules follow in
/// [`ColorKey::ALL`] order, so later roles win on shared selectors. Primary rules are
/// always emitted, using `fallback` when primary resolves to nothing. An invalid
/// `fallback` is replaced by [`DEFAULT_FALLBACK_COLOR`].
pub fn color_stylesheet(
    overrides: &BTreeMap<ColorKey, String>,
    original: &ColorPalette,
    fallback: &str,
) -> String {
    let fallback = match validate_color(fallback) {
        Ok(()) => fallback.trim(),
        Err(_) => {
            tracing::warn!(value = fallback, "ignoring invalid fallback color");
            DEFAULT_FALLBACK_COLOR
        }
    };
    let resolved: Vec<(ColorKey, Option<&str>)> = ColorKey::ALL
        .into_iter()
        .map(|key| (key, resolve_color(key, overrides, original)))
        .collect();

    let mut css = String::from(":root {\n");
    for (key, value) in &resolved {
        if let Some(value) = value {
            css.push_str(&format!("  --color-{}: {};\n", key, value.trim()));
        }
    }
    css.push_str("}\n");

    for (key, value) in &resolved {
        let value = match (key, value) {
            (_, Some(value)) => value.trim(),
            (ColorKey::Primary, None) => fallback,
            (_, None) => continue,
        };
        for (selector, properties) in rules_for(*key) {
            let declarations: Vec<String> = properties
                .iter()
                .map(|property| format!("{}: {} !important;", property, value))
                .collect();
            css.push_str(&format!("{} {{ {} }}\n", selector, declarations.join(" ")));
        }
    }

    css
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(ColorKey, &str)]) -> BTreeMap<ColorKey, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_override_then_original() {
        let original = ColorPalette::new().with(ColorKey::Background, "#FFFFFF");
        let css = color_stylesheet(
            &overrides(&[(ColorKey::Primary, "#FF0000")]),
            &original,
            "#007AFF",
        );

        assert!(css.contains("--color-primary: #FF0000;"));
        assert!(css.contains("--color-background: #FFFFFF;"));
        assert!(css.contains(
            "background-color: #FF0000 !important; border-color: #FF0000 !important;"
        ));
        assert!(css.contains("body, .bg-background { background-color: #FFFFFF !important; }"));
        assert!(!css.contains("--color-accent"));
        assert!(!css.contains("--color-secondary"));
        assert!(!css.contains("--color-text"));
        assert!(!css.contains("#007AFF"));
    }

    #[test]
    fn test_fallback_only_when_primary_unresolved() {
        let css = color_stylesheet(
            &overrides(&[(ColorKey::Secondary, "#00FF00")]),
            &ColorPalette::new(),
            "#007AFF",
        );
        assert!(!css.contains("--color-primary"));
        assert!(css.contains("background-color: #007AFF !important;"));
        assert!(css.contains("--color-secondary: #00FF00;"));

        let original = ColorPalette::new().with(ColorKey::Primary, "#123456");
        let css = color_stylesheet(&overrides(&[(ColorKey::Text, "#000")]), &original, "#007AFF");
        assert!(css.contains("--color-primary: #123456;"));
        assert!(!css.contains("#007AFF"));
    }

    #[test]
    fn test_invalid_override_falls_back_to_original() {
        let original = ColorPalette::new().with(ColorKey::Accent, "teal");
        let css = color_stylesheet(
            &overrides(&[(ColorKey::Accent, "red} body {display:none")]),
            &original,
            "#007AFF",
        );
        assert!(css.contains("--color-accent: teal;"));
        assert!(!css.contains("display:none"));
    }

    #[test]
    fn test_invalid_fallback_uses_default() {
        let css = color_stylesheet(
            &overrides(&[(ColorKey::Text, "#111")]),
            &ColorPalette::new(),
            "red}</style><script>",
        );
        assert!(css.contains("background-color: #007AFF !important;"));
        assert!(!css.contains("</style>"));
    }

    #[test]
    fn test_rule_order_follows_roles() {
        let css = color_stylesheet(
            &overrides(&[(ColorKey::Text, "#111"), (ColorKey::Background, "#eee")]),
            &ColorPalette::new(),
            "#007AFF",
        );
        let background = css.find("body, .bg-background").unwrap();
        let text = css.find("body, h1, h2, h3, p").unwrap();
        let primary = css.find("button, .btn").unwrap();
        assert!(primary < background);
        assert!(background < text);
    }
}
