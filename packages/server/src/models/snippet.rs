use common::record::SnippetListing;
use serde::Serialize;

/// Response DTO for a successful upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Generated snippet id.
    #[schema(example = "7f8a1b7e-23a4-4b9d-9f51-0a6c1f2d3e4a")]
    pub uid: String,
}

/// Response DTO for listing a user's snippets.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RecordListResponse {
    pub records: Vec<SnippetListing>,
    pub total: u64,
}
