use common::UploadQuota;
use common::quota::DEFAULT_LIMIT_PATH;
use common::store::{DocumentStore, StoreError};
use tracing::info;

use crate::config::QuotaConfig;

/// Seed the process-wide default quota at `limits/defaultLimit`.
///
/// An already-present value is left untouched.
pub async fn seed_default_quota(
    store: &dyn DocumentStore,
    config: &QuotaConfig,
) -> Result<(), StoreError> {
    if store.read(DEFAULT_LIMIT_PATH).await?.is_some() {
        info!("Default upload quota already present");
        return Ok(());
    }

    let quota = UploadQuota {
        current_amount: 0,
        max_amount: config.max_amount,
        max_upload_size_kb: config.max_upload_size_kb,
    };
    let doc =
        serde_json::to_value(&quota).map_err(|e| StoreError::malformed(DEFAULT_LIMIT_PATH, e))?;
    store.write(DEFAULT_LIMIT_PATH, doc).await?;

    info!(
        max_amount = quota.max_amount,
        max_upload_size_kb = quota.max_upload_size_kb,
        "Seeded default upload quota"
    );
    Ok(())
}
