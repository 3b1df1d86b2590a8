//! Persistence boundary for generated websites.
//!
//! The editor core never talks to storage directly: sessions hand a
//! [`PersistRecord`] to a [`WebsiteStore`] on save and publish.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::palette::ColorPalette;
use crate::snapshot::CustomizationSnapshot;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Website '{id}' not found")]
    NotFound { id: Uuid },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored customizations: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Asset rejected: {0}")]
    InvalidAsset(String),
}

/// What a save or publish writes for one website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistRecord {
    pub rendered_html: String,
    pub customizations: CustomizationSnapshot,
    pub updated_at: DateTime<Utc>,
    /// Set on publish only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PersistRecord {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// A generated website as stored, enough to resume editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRecord {
    pub id: Uuid,
    pub base_html: String,
    pub rendered_html: Option<String>,
    pub original_colors: ColorPalette,
    pub customizations: CustomizationSnapshot,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Largest image accepted by [`WebsiteStore::upload_asset`].
pub const MAX_ASSET_BYTES: usize = 5 * 1024 * 1024;

#[async_trait]
pub trait WebsiteStore: Send + Sync {
    async fn fetch(&self, id: Uuid) -> Result<Option<WebsiteRecord>, StoreError>;

    /// Write rendered HTML and customizations. Publishing also sets the publication flag.
    async fn persist(&self, id: Uuid, record: PersistRecord) -> Result<(), StoreError>;

    /// Store an uploaded image and return the URL to use as its `src`.
    async fn upload_asset(
        &self,
        website_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, StoreError>;
}

/// Content address of an asset: lowercase hex SHA-256.
pub fn asset_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Check size and extension of an uploaded image, returning its lowercase extension.
pub fn check_asset(filename: &str, bytes: &[u8]) -> Result<String, StoreError> {
    const ALLOWED: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

    if bytes.is_empty() {
        return Err(StoreError::InvalidAsset("empty file".to_string()));
    }
    if bytes.len() > MAX_ASSET_BYTES {
        return Err(StoreError::InvalidAsset(format!(
            "{} bytes exceeds the {} byte limit",
            bytes.len(),
            MAX_ASSET_BYTES
        )));
    }
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED.contains(&extension.as_str()) {
        return Err(StoreError::InvalidAsset(format!(
            "'{}' is not an image (expected one of {})",
            filename,
            ALLOWED.join(", ")
        )));
    }
    Ok(extension)
}

/// In-process store used by tests.
#[derive(Default)]
pub struct MemoryWebsiteStore {
    websites: Mutex<HashMap<Uuid, WebsiteRecord>>,
    assets: Mutex<HashMap<String, Vec<u8>>>,
    /// Number of upcoming `persist` calls that fail, to exercise retry paths.
    failures: Mutex<usize>,
}

impl MemoryWebsiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly generated website.
    pub async fn insert(&self, id: Uuid, base_html: &str, original_colors: ColorPalette) {
        let record = WebsiteRecord {
            id,
            base_html: base_html.to_string(),
            rendered_html: None,
            original_colors,
            customizations: CustomizationSnapshot::default(),
            is_published: false,
            published_at: None,
            updated_at: Utc::now(),
        };
        self.websites.lock().await.insert(id, record);
    }

    pub async fn fail_next_persists(&self, count: usize) {
        *self.failures.lock().await = count;
    }

    pub async fn asset(&self, hash: &str) -> Option<Vec<u8>> {
        self.assets.lock().await.get(hash).cloned()
    }
}

#[async_trait]
impl WebsiteStore for MemoryWebsiteStore {
    async fn fetch(&self, id: Uuid) -> Result<Option<WebsiteRecord>, StoreError> {
        Ok(self.websites.lock().await.get(&id).cloned())
    }

    async fn persist(&self, id: Uuid, record: PersistRecord) -> Result<(), StoreError> {
        {
            let mut failures = self.failures.lock().await;
            if *failures > 0 {
                *failures -= 1;
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
        }

        let mut websites = self.websites.lock().await;
        let website = websites.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        website.rendered_html = Some(record.rendered_html);
        website.customizations = record.customizations;
        website.updated_at = record.updated_at;
        if let Some(published_at) = record.published_at {
            website.is_published = true;
            website.published_at = Some(published_at);
        }
        Ok(())
    }

    async fn upload_asset(
        &self,
        website_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, StoreError> {
        let extension = check_asset(filename, bytes)?;
        if !self.websites.lock().await.contains_key(&website_id) {
            return Err(StoreError::NotFound { id: website_id });
        }
        let hash = asset_hash(bytes);
        self.assets
            .lock()
            .await
            .entry(hash.clone())
            .or_insert_with(|| bytes.to_vec());
        Ok(format!("/assets/{}.{}", hash, extension))
    }
}
