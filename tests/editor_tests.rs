use iwasp_site_editor::{
    ColorKey, ColorPalette, CustomizationSnapshot, Edit, EditorConfig, EditorSession,
    MemoryWebsiteStore, SessionState, SlotKind, TextSlot, WebsiteStore, compose,
    compose_with_config, extract,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

fn get_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("fixtures");
    path.push(filename);
    fs::read_to_string(&path).unwrap()
}

fn snapshot(edits: &[(&str, &str, &str)]) -> CustomizationSnapshot {
    edits.iter().fold(CustomizationSnapshot::new(), |snap, (category, key, value)| {
        snap.with_edit(Edit::parse(category, key, *value).unwrap())
    })
}

// Extraction

#[test]
fn test_landing_descriptors() {
    let base = get_fixture("landing.html");
    let found = extract(&base);
    let ids: Vec<String> = found.iter().map(|d| d.id.to_string()).collect();
    assert_eq!(
        ids,
        vec!["h1-0", "h2-0", "h2-1", "h3-0", "h3-1", "p-0", "p-1", "btn-0", "btn-1"]
    );

    let labels: Vec<&str> = found.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Titre principal 1",
            "Sous-titre 1",
            "Sous-titre 2",
            "Section 1",
            "Section 2",
            "Paragraphe 1",
            "Paragraphe 2",
            "Bouton 1",
            "Bouton 2",
        ]
    );
    assert_eq!(found[7].original_value, "Prendre rendez-vous");
    assert_eq!(found[8].original_value, "Écrire");
}

#[test]
fn test_extract_twice_is_identical() {
    let base = get_fixture("landing.html");
    assert_eq!(extract(&base), extract(&base));
}

#[test]
fn test_document_without_editable_text() {
    let base = get_fixture("no-text.html");
    assert!(extract(&base).is_empty());

    let mut session = EditorSession::default();
    session.load(base, ColorPalette::new());
    assert_eq!(session.state(), SessionState::Extracted);
    assert!(session.descriptors().is_empty());
    assert!(session.preview().unwrap().contains("<title>Empty</title>"));
}

#[test]
fn test_extracted_ids_address_composed_elements() {
    let base = get_fixture("landing.html");
    let edits: Vec<(String, String)> = extract(&base)
        .into_iter()
        .map(|d| (d.id.to_string(), format!("[{}]", d.id)))
        .collect();
    let snap = edits.iter().fold(CustomizationSnapshot::new(), |snap, (id, value)| {
        snap.with_edit(Edit::parse("texts", id, value.clone()).unwrap())
    });

    let out = compose(&base, &snap, &ColorPalette::new());
    for (id, value) in &edits {
        assert!(out.contains(value.as_str()), "{} was not applied", id);
    }
    assert!(out.contains("<p>Ok</p>"));
}

// Composition

#[test]
fn test_title_edit_then_undo() {
    let base = "<html><head></head><body><h1>Old Title</h1><p>Twenty-five characters ok</p></body></html>";
    let found = extract(base);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, TextSlot::new(SlotKind::H1, 0));
    assert_eq!(found[0].label, "Titre principal 1");
    assert_eq!(found[0].original_value, "Old Title");
    assert_eq!(found[1].id.to_string(), "p-0");

    let mut session = EditorSession::default();
    session.load(base, ColorPalette::new());
    session.update_raw("texts", "h1-0", "New Title").unwrap();
    assert!(session.preview().unwrap().contains("<h1>New Title</h1>"));

    session.undo();
    assert!(session.preview().unwrap().contains("<h1>Old Title</h1>"));
}

#[test]
fn test_primary_override_with_original_background() {
    let base = get_fixture("landing.html");
    let original = ColorPalette::new().with(ColorKey::Background, "#FFFFFF");
    let out = compose(&base, &snapshot(&[("colors", "primary", "#FF0000")]), &original);

    assert!(out.contains("--color-primary: #FF0000;"));
    assert!(out.contains("--color-background: #FFFFFF;"));
    assert!(out.contains("body, .bg-background { background-color: #FFFFFF !important; }"));
    assert!(!out.contains("--color-accent"));
    assert!(!out.contains("--color-secondary"));
    assert!(!out.contains("--color-text"));
    assert!(!out.contains("#007AFF"));
    // The site's own stylesheet stays in place.
    assert!(out.contains("body{font-family:sans-serif;color:#222}"));
}

#[test]
fn test_literal_fallback_color() {
    let base = get_fixture("landing.html");
    let out = compose(&base, &snapshot(&[("colors", "text", "#101010")]), &ColorPalette::new());
    assert!(out.contains("background-color: #007AFF !important;"));

    let config = EditorConfig::from_yaml("fallback_color: \"#0A0A0A\"").unwrap();
    let out = compose_with_config(
        &base,
        &snapshot(&[("colors", "text", "#101010")]),
        &ColorPalette::new(),
        &config,
    );
    assert!(out.contains("background-color: #0A0A0A !important;"));
    assert!(!out.contains("#007AFF"));
}

#[test]
fn test_stale_ids_compose_like_missing_ids() {
    let base = get_fixture("landing.html");
    let clean = snapshot(&[("texts", "h2-1", "Nous écrire"), ("images", "logo", "/new.svg")]);
    let stale = clean
        .with_edit(Edit::parse("texts", "h1-3", "ghost").unwrap())
        .with_edit(Edit::parse("texts", "btn-40", "ghost").unwrap())
        .with_edit(Edit::parse("images", "missing.png", "/ghost.png").unwrap());

    let palette = ColorPalette::new();
    assert_eq!(compose(&base, &stale, &palette), compose(&base, &clean, &palette));
}

#[test]
fn test_compose_is_pure() {
    let base = get_fixture("landing.html");
    let snap = snapshot(&[
        ("texts", "p-1", "Nouveau texte pour les ateliers du samedi."),
        ("colors", "accent", "rgb(12, 120, 80)"),
        ("images", "1", "/uploads/atelier.jpg"),
    ]);
    let palette = ColorPalette::new().with(ColorKey::Primary, "#224466");
    let first = compose(&base, &snap, &palette);
    assert_eq!(first, compose(&base, &snap, &palette));
    assert!(first.contains("/uploads/atelier.jpg"));
    assert!(first.contains("logo.svg"));
}

#[test]
fn test_empty_snapshot_only_normalizes() {
    let base = get_fixture("landing.html");
    let out = compose(&base, &CustomizationSnapshot::new(), &ColorPalette::new());
    assert!(out.starts_with("<!DOCTYPE html>"));
    assert!(!out.contains("iwasp-customizations"));
    assert_eq!(extract(&out), extract(&base));
}

// History

#[test]
fn test_undo_redo_restores_snapshot() {
    let base = get_fixture("landing.html");
    let mut session = EditorSession::default();
    session.load(base, ColorPalette::new());

    session.update_raw("texts", "h1-0", "Atelier Nour & Fils").unwrap();
    session.update_raw("colors", "primary", "#AA3300").unwrap();
    session.update_raw("images", "workshop", "/uploads/w.jpg").unwrap();
    let before = session.current().unwrap().clone();
    let preview_before = session.preview().unwrap().to_string();

    assert!(session.undo());
    assert!(session.redo());
    assert_eq!(session.current().unwrap(), &before);
    assert_eq!(session.preview().unwrap(), preview_before);
}

#[test]
fn test_edit_after_undo_drops_redo() {
    let base = get_fixture("landing.html");
    let mut session = EditorSession::default();
    session.load(base, ColorPalette::new());

    session.update_raw("texts", "h1-0", "One").unwrap();
    session.update_raw("texts", "h1-0", "Two").unwrap();
    session.undo();
    session.update_raw("texts", "h1-0", "Three").unwrap();

    assert!(!session.can_redo());
    assert!(!session.redo());
    assert_eq!(
        session.current().unwrap().text(TextSlot::new(SlotKind::H1, 0)),
        Some("Three")
    );
}

#[test]
fn test_history_limit_from_config() {
    let config = EditorConfig::from_yaml("history_limit: 2").unwrap();
    let mut session = EditorSession::new(config).unwrap();
    session.load(get_fixture("landing.html"), ColorPalette::new());

    session.update_raw("texts", "h1-0", "One").unwrap();
    session.update_raw("texts", "h1-0", "Two").unwrap();
    assert!(session.undo());
    assert!(!session.undo());
    assert_eq!(
        session.current().unwrap().text(TextSlot::new(SlotKind::H1, 0)),
        Some("One")
    );
}

// Persistence

#[tokio::test]
async fn test_save_and_resume_round_trip() {
    let base = get_fixture("landing.html");
    let original = ColorPalette::new().with(ColorKey::Primary, "#224466");
    let store = MemoryWebsiteStore::new();
    let id = Uuid::new_v4();
    store.insert(id, &base, original.clone()).await;

    let mut session = EditorSession::default();
    session.load(base.clone(), original.clone());
    session.update_raw("texts", "btn-0", "Réserver").unwrap();
    session.update_raw("colors", "background", "#FAF7F2").unwrap();
    session.save_draft(&store, id).await.unwrap();

    let record = store.fetch(id).await.unwrap().unwrap();
    assert_eq!(
        record.rendered_html.as_deref(),
        Some(compose(&base, session.current().unwrap(), &original).as_str())
    );

    let mut resumed = EditorSession::default();
    resumed.resume_record(&record);
    assert_eq!(resumed.preview(), session.preview());
    assert_eq!(resumed.descriptors(), session.descriptors());
}
