use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::store::{DocumentStore, StoreError};

/// Store path of the process-wide default quota, seeded at startup.
pub const DEFAULT_LIMIT_PATH: &str = "limits/defaultLimit";

/// Per-user upload quota.
///
/// `current_amount` counts reserved-or-committed uploads. It is signed on
/// purpose: a compensating release can briefly push it below zero, and the
/// value self-corrects on the next reserve/release pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadQuota {
    pub current_amount: i64,
    pub max_amount: i64,
    pub max_upload_size_kb: i64,
}

#[derive(Debug, Error)]
pub enum QuotaError {
    /// `limits/defaultLimit` is missing from the store: a deployment error,
    /// not a per-request condition.
    #[error("default upload quota is not configured")]
    MissingDefault,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reserve/release protocol for the per-user upload counter.
///
/// Every counter mutation goes through the store's per-path transaction; the
/// counter is never read-then-blind-written.
#[derive(Clone)]
pub struct QuotaService {
    store: Arc<dyn DocumentStore>,
}

impl QuotaService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Optimistically reserve one upload slot for `user_id` and return the
    /// committed quota.
    ///
    /// The per-user quota is created lazily from the default on first
    /// reservation. The returned `current_amount` may exceed `max_amount`;
    /// callers reject on that and compensate with [`release`](Self::release).
    pub async fn reserve(&self, user_id: &str) -> Result<UploadQuota, QuotaError> {
        let default = match self.store.read(DEFAULT_LIMIT_PATH).await? {
            Some(doc) => serde_json::from_value::<UploadQuota>(doc)
                .map_err(|e| StoreError::malformed(DEFAULT_LIMIT_PATH, e))?,
            None => return Err(QuotaError::MissingDefault),
        };

        let path = custom_quota_path(user_id);
        let committed = self
            .store
            .transact(&path, &|current| {
                // An absent (or unreadable) node is seeded from the default.
                let quota = current
                    .and_then(|doc| serde_json::from_value::<UploadQuota>(doc.clone()).ok())
                    .unwrap_or_else(|| default.clone());
                quota_doc(&UploadQuota {
                    current_amount: quota.current_amount + 1,
                    ..quota
                })
            })
            .await?;

        Ok(serde_json::from_value(committed).map_err(|e| StoreError::malformed(&path, e))?)
    }

    /// Compensate a reservation whose upload failed after the slot was taken.
    ///
    /// Decrements the raw counter node with no floor: transiently negative
    /// values are tolerated rather than clamped. Safe to call even when no
    /// custom quota exists yet.
    pub async fn release(&self, user_id: &str) -> Result<(), QuotaError> {
        let path = format!("{}/current_amount", custom_quota_path(user_id));
        self.store
            .transact(&path, &|current| {
                let amount = current.and_then(Value::as_i64).unwrap_or(0);
                Value::from(amount - 1)
            })
            .await?;
        Ok(())
    }
}

fn custom_quota_path(user_id: &str) -> String {
    format!("limits/customQuotas/{user_id}")
}

/// Serialize a quota without a fallible step; update functions handed to
/// `transact` must be total.
fn quota_doc(quota: &UploadQuota) -> Value {
    serde_json::json!({
        "current_amount": quota.current_amount,
        "max_amount": quota.max_amount,
        "max_upload_size_kb": quota.max_upload_size_kb,
    })
}
