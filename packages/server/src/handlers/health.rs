/// Plain-text banner at the service root.
pub async fn welcome() -> &'static str {
    "Welcome to the snippetd API endpoint"
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    operation_id = "healthCheck",
    summary = "Simple health check",
    responses((status = 200, description = "Service is up")),
)]
pub async fn health() -> &'static str {
    "OK"
}
