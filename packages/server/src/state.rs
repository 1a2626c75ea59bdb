use std::sync::Arc;

use common::record::RecordStore;
use common::store::DocumentStore;
use common::upload::UploadService;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub uploads: UploadService,
    pub records: RecordStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self {
            uploads: UploadService::new(store.clone()),
            records: RecordStore::new(store),
            config,
        }
    }
}
