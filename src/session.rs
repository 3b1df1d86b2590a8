//! One editing session over one base document.
//!
//! ```text
//! Idle --load--> Extracted --update--> Editing --save/publish--> Editing
//!   ^                                                               |
//!   +------------------------- load (new base) ---------------------+
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::compositor::compose;
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::extractor::{EditableDescriptor, extract};
use crate::history::History;
use crate::palette::ColorPalette;
use crate::snapshot::{CustomizationSnapshot, Edit};
use crate::store::{PersistRecord, WebsiteRecord, WebsiteStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No base document loaded.
    Idle,
    /// Descriptors computed, nothing edited yet.
    Extracted,
    Editing,
}

#[derive(Debug)]
struct LoadedDocument {
    base: String,
    original_colors: ColorPalette,
    descriptors: Vec<EditableDescriptor>,
    history: History,
    preview: String,
    /// Snapshot last handed to the store, if any.
    saved: Option<CustomizationSnapshot>,
}

impl LoadedDocument {
    fn refresh(&mut self, config: &EditorConfig) {
        self.preview = compose(
            &self.base,
            self.history.current(),
            &self.original_colors,
            config,
        );
    }
}

#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    document: Option<LoadedDocument>,
    state: SessionState,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            document: None,
            state: SessionState::Idle,
        }
    }
}

impl EditorSession {
    /// Create an idle session. Fails if `config` does not pass [`EditorConfig::validate`].
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Start over on a new base document. Any previous history is discarded.
    pub fn load(&mut self, base: impl Into<String>, original_colors: ColorPalette) {
        self.start(base.into(), original_colors, CustomizationSnapshot::default());
    }

    /// Start from customizations saved by an earlier session.
    pub fn resume(
        &mut self,
        base: impl Into<String>,
        original_colors: ColorPalette,
        saved: CustomizationSnapshot,
    ) {
        self.start(base.into(), original_colors, saved.clone());
        if let Some(doc) = self.document.as_mut() {
            doc.saved = Some(saved);
        }
    }

    pub fn resume_record(&mut self, record: &WebsiteRecord) {
        self.resume(
            record.base_html.clone(),
            record.original_colors.clone(),
            record.customizations.clone(),
        );
    }

    fn start(
        &mut self,
        base: String,
        original_colors: ColorPalette,
        initial: CustomizationSnapshot,
    ) {
        let descriptors = extract(&base, &self.config);
        if descriptors.is_empty() {
            tracing::info!("no editable text detected in base document");
        }
        let mut doc = LoadedDocument {
            base,
            original_colors,
            descriptors,
            history: History::new(initial).with_limit(self.config.history_limit),
            preview: String::new(),
            saved: None,
        };
        doc.refresh(&self.config);
        self.document = Some(doc);
        self.state = SessionState::Extracted;
    }

    pub fn descriptors(&self) -> &[EditableDescriptor] {
        self.document
            .as_ref()
            .map(|doc| doc.descriptors.as_slice())
            .unwrap_or_default()
    }

    pub fn base(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.base.as_str())
    }

    pub fn original_colors(&self) -> Option<&ColorPalette> {
        self.document.as_ref().map(|doc| &doc.original_colors)
    }

    pub fn current(&self) -> Option<&CustomizationSnapshot> {
        self.document.as_ref().map(|doc| doc.history.current())
    }

    /// The rendered document for the current snapshot. Always in sync with history.
    pub fn preview(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.preview.as_str())
    }

    pub fn can_undo(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| doc.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| doc.history.can_redo())
    }

    /// True when the current snapshot differs from the last one persisted.
    pub fn has_unsaved_changes(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| match &doc.saved {
            Some(saved) => saved != doc.history.current(),
            None => !doc.history.current().is_empty(),
        })
    }

    fn loaded_mut(&mut self) -> EditorResult<&mut LoadedDocument> {
        self.document.as_mut().ok_or(EditorError::NoDocument)
    }

    pub fn update(&mut self, edit: Edit) -> EditorResult<()> {
        let config = &self.config;
        let doc = self.document.as_mut().ok_or(EditorError::NoDocument)?;
        tracing::debug!(category = %edit.category(), "applying edit");
        doc.history.update(edit);
        doc.refresh(config);
        self.state = SessionState::Editing;
        Ok(())
    }

    /// Boundary form of [`EditorSession::update`] taking the UI's string triple.
    pub fn update_raw(&mut self, category: &str, key: &str, value: &str) -> EditorResult<()> {
        self.loaded_mut()?;
        self.update(Edit::parse(category, key, value)?)
    }

    /// Discard every customization as a new, undoable history entry.
    pub fn reset(&mut self) -> EditorResult<()> {
        let config = &self.config;
        let doc = self.document.as_mut().ok_or(EditorError::NoDocument)?;
        if doc.history.current().is_empty() {
            return Ok(());
        }
        doc.history.push(CustomizationSnapshot::default());
        doc.refresh(config);
        self.state = SessionState::Editing;
        Ok(())
    }

    /// Step back in history. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let config = &self.config;
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        if !doc.history.undo() {
            return false;
        }
        doc.refresh(config);
        self.state = SessionState::Editing;
        true
    }

    /// Step forward in history. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let config = &self.config;
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        if !doc.history.redo() {
            return false;
        }
        doc.refresh(config);
        self.state = SessionState::Editing;
        true
    }

    /// Persist the current rendering as a draft. On failure the session is unchanged
    /// and the call can be retried.
    pub async fn save_draft<S>(
        &mut self,
        store: &S,
        website_id: Uuid,
    ) -> EditorResult<DateTime<Utc>>
    where
        S: WebsiteStore + ?Sized,
    {
        self.persist(store, website_id, false).await
    }

    /// Persist and mark the website as published.
    pub async fn publish<S>(&mut self, store: &S, website_id: Uuid) -> EditorResult<DateTime<Utc>>
    where
        S: WebsiteStore + ?Sized,
    {
        self.persist(store, website_id, true).await
    }

    async fn persist<S>(
        &mut self,
        store: &S,
        website_id: Uuid,
        publish: bool,
    ) -> EditorResult<DateTime<Utc>>
    where
        S: WebsiteStore + ?Sized,
    {
        let doc = self.loaded_mut()?;
        let now = Utc::now();
        let snapshot = doc.history.current().clone();
        let record = PersistRecord {
            rendered_html: doc.preview.clone(),
            customizations: snapshot.clone(),
            updated_at: now,
            published_at: publish.then_some(now),
        };

        if let Err(err) = store.persist(website_id, record).await {
            tracing::warn!(
                website = %website_id,
                publish,
                error = %err,
                "persisting website failed"
            );
            return Err(err.into());
        }

        let doc = self.loaded_mut()?;
        doc.saved = Some(snapshot);
        self.state = SessionState::Editing;
        Ok(now)
    }

    /// Upload an image and point the image matched by `selector` at it.
    pub async fn upload_image<S>(
        &mut self,
        store: &S,
        website_id: Uuid,
        selector: &str,
        filename: &str,
        bytes: &[u8],
    ) -> EditorResult<String>
    where
        S: WebsiteStore + ?Sized,
    {
        self.loaded_mut()?;
        let url = store.upload_asset(website_id, filename, bytes).await?;
        self.update(Edit::Image(selector.to_string(), url.clone()))?;
        Ok(url)
    }
}
