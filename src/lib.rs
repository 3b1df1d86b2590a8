//! # i-wasp Website Editor core
//!
//! Visual editing of generated marketing websites: discover the editable text of a
//! base HTML document, record text/color/image overrides with undo/redo, and
//! re-derive the full document from the untouched base plus the current overrides.
//!
//! ## Features
//! - Deterministic content extraction (`h1`-`h3`, paragraphs, button labels)
//! - Typed element ids (`h1-0`, `p-2`, `btn-1`) valid for one base document
//! - Snapshot history with structural sharing between entries
//! - Pure composition: text replacement, injected color stylesheet, image swaps
//! - Persistence boundary with PostgreSQL and in-memory stores
//!
//! ## Example
//! ```ignore
//! use iwasp_site_editor::{ColorPalette, EditorSession};
//!
//! let mut session = EditorSession::default();
//! session.load("<h1>Old Title</h1>", ColorPalette::new());
//! session.update_raw("texts", "h1-0", "New Title")?;
//! let html = session.preview().unwrap();
//! ```

pub mod compositor;
pub mod config;
pub mod db;
mod dom;
pub mod error;
pub mod extractor;
pub mod history;
pub mod palette;
pub mod session;
pub mod slot;
pub mod snapshot;
pub mod store;
pub mod stylesheet;

// --- Core types ---
pub use config::EditorConfig;
pub use error::{EditorError, EditorResult};
pub use extractor::EditableDescriptor;
pub use history::History;
pub use palette::{ColorKey, ColorPalette};
pub use session::{EditorSession, SessionState};
pub use slot::{SlotKind, TextSlot};
pub use snapshot::{Category, CustomizationSnapshot, Edit};

// --- Persistence ---
pub use db::PgWebsiteStore;
pub use store::{MemoryWebsiteStore, PersistRecord, StoreError, WebsiteRecord, WebsiteStore};

/// Extract editable descriptors with the default configuration.
pub fn extract(base: &str) -> Vec<EditableDescriptor> {
    extractor::extract(base, &EditorConfig::default())
}

/// Extract editable descriptors with a custom configuration.
pub fn extract_with_config(base: &str, config: &EditorConfig) -> Vec<EditableDescriptor> {
    extractor::extract(base, config)
}

/// Compose a rendered document with the default configuration.
pub fn compose(
    base: &str,
    snapshot: &CustomizationSnapshot,
    original_colors: &ColorPalette,
) -> String {
    compositor::compose(base, snapshot, original_colors, &EditorConfig::default())
}

/// Compose a rendered document with a custom configuration.
pub fn compose_with_config(
    base: &str,
    snapshot: &CustomizationSnapshot,
    original_colors: &ColorPalette,
    config: &EditorConfig,
) -> String {
    compositor::compose(base, snapshot, original_colors, config)
}
