use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let upload = Router::new()
        .route("/upload", post(handlers::snippet::upload_snippet))
        .layer(handlers::snippet::upload_body_limit());

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/download/{uid}", get(handlers::snippet::download_snippet))
        .route("/records", get(handlers::snippet::list_records))
        .merge(upload)
}
