use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::preview::{PREVIEW_COLUMNS, PREVIEW_LINES, generate_preview};
use crate::store::{DocumentStore, StoreError};

/// Client-submitted request to save a code snippet.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewSnippet {
    pub title: String,
    pub language: String,
    pub tags: Vec<String>,
    pub filename: String,
    pub full_content: String,
}

/// Lightweight per-user listing record, carrying preview content limited to
/// 10 lines and 100 columns for fast history loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SnippetListing {
    pub uid: String,
    pub title: String,
    pub language: String,
    pub preview_content: String,
    pub tags: Vec<String>,
    pub filename: String,
}

impl SnippetListing {
    /// Derive the listing facet of `snippet` under the generated `uid`.
    pub fn derive(snippet: &NewSnippet, uid: String) -> Self {
        Self {
            uid,
            title: snippet.title.clone(),
            language: snippet.language.clone(),
            preview_content: generate_preview(
                &snippet.full_content,
                PREVIEW_LINES,
                PREVIEW_COLUMNS,
            ),
            tags: snippet.tags.clone(),
            filename: snippet.filename.clone(),
        }
    }
}

/// Persisted record carrying the complete uploaded content next to its
/// listing facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FullSnippet {
    pub full_content: String,
    pub listing: SnippetListing,
}

/// Typed persistence facade over the document store for snippet records.
///
/// Record writes have a single owning writer per id, so plain `write` is
/// sufficient here; nothing record-shaped goes through `transact`.
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn DocumentStore>,
}

impl RecordStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist the full record under `records/{uid}` and its listing under
    /// `users/{user_id}/records/{key}`.
    ///
    /// The two writes are independent, with no cross-write atomicity; a
    /// crash in between can leave a full record without a listing.
    pub async fn save(&self, user_id: &str, full: &FullSnippet) -> Result<(), StoreError> {
        let full_path = full_record_path(&full.listing.uid);
        let full_doc =
            serde_json::to_value(full).map_err(|e| StoreError::malformed(&full_path, e))?;
        self.store.write(&full_path, full_doc).await?;

        // UUIDv7 keys sort by creation time, keeping listings in upload order.
        let listing_path = format!("users/{user_id}/records/{}", Uuid::now_v7());
        let listing_doc = serde_json::to_value(&full.listing)
            .map_err(|e| StoreError::malformed(&listing_path, e))?;
        self.store.write(&listing_path, listing_doc).await
    }

    /// Load the full record for `uid`. An unknown id is a defined empty
    /// result, not an error.
    pub async fn load_full(&self, uid: &str) -> Result<Option<FullSnippet>, StoreError> {
        let path = full_record_path(uid);
        match self.store.read(&path).await? {
            Some(doc) => serde_json::from_value(doc)
                .map(Some)
                .map_err(|e| StoreError::malformed(&path, e)),
            None => Ok(None),
        }
    }

    /// All listing records for `user_id`, in key (= upload) order.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<SnippetListing>, StoreError> {
        let path = format!("users/{user_id}/records");
        let Some(node) = self.store.read(&path).await? else {
            return Ok(Vec::new());
        };
        let Some(entries) = node.as_object() else {
            return Err(StoreError::malformed(&path, "expected an object of listings"));
        };
        entries
            .values()
            .map(|doc| {
                serde_json::from_value(doc.clone()).map_err(|e| StoreError::malformed(&path, e))
            })
            .collect()
    }
}

fn full_record_path(uid: &str) -> String {
    format!("records/{uid}")
}
