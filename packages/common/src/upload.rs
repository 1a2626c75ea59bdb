use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::quota::{QuotaError, QuotaService, UploadQuota};
use crate::record::{FullSnippet, NewSnippet, RecordStore, SnippetListing};
use crate::store::{DocumentStore, StoreError};
use crate::validate::{ValidationError, validate_against_quota, validate_structure};

#[derive(Debug, Error)]
pub enum UploadError {
    /// Client-caused rejection; the reserved slot has already been released
    /// by the time this is returned.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("default upload quota is not configured")]
    MissingDefaultQuota,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<QuotaError> for UploadError {
    fn from(err: QuotaError) -> Self {
        match err {
            QuotaError::MissingDefault => UploadError::MissingDefaultQuota,
            QuotaError::Store(e) => UploadError::Store(e),
        }
    }
}

/// End-to-end upload pipeline: reserve a quota slot, validate, persist, and
/// roll the reservation back when anything after the reserve fails.
#[derive(Clone)]
pub struct UploadService {
    quotas: QuotaService,
    records: RecordStore,
}

impl UploadService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            quotas: QuotaService::new(store.clone()),
            records: RecordStore::new(store),
        }
    }

    /// Run the full upload sequence for `user_id` and return the generated
    /// snippet id.
    ///
    /// The slot is reserved before any validation runs, so even a
    /// structurally invalid upload briefly holds (and then releases) a
    /// slot; malformed input cannot sidestep the counter.
    pub async fn upload(&self, user_id: &str, snippet: NewSnippet) -> Result<String, UploadError> {
        let quota = self.quotas.reserve(user_id).await?;

        match self.validate_and_persist(user_id, snippet, &quota).await {
            Ok(uid) => {
                info!(user_id, uid = %uid, "snippet stored");
                Ok(uid)
            }
            Err(err) => {
                self.rollback(user_id).await;
                Err(err)
            }
        }
    }

    async fn validate_and_persist(
        &self,
        user_id: &str,
        snippet: NewSnippet,
        quota: &UploadQuota,
    ) -> Result<String, UploadError> {
        validate_structure(&snippet)?;
        validate_against_quota(&snippet, quota)?;

        // Collision probability is negligible; the store is not consulted
        // for uniqueness.
        let uid = Uuid::new_v4().to_string();
        let listing = SnippetListing::derive(&snippet, uid.clone());
        let full = FullSnippet {
            full_content: snippet.full_content,
            listing,
        };
        self.records.save(user_id, &full).await?;
        Ok(uid)
    }

    /// Exactly one compensating release per failed reservation. A failing
    /// release is reported but must not mask the error that triggered it.
    async fn rollback(&self, user_id: &str) {
        if let Err(err) = self.quotas.release(user_id).await {
            error!(user_id, error = %err, "failed to release reserved quota slot");
        }
    }
}
