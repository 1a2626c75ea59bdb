use thiserror::Error;

use crate::quota::UploadQuota;
use crate::record::NewSnippet;

const MAX_FIELD_CHARS: usize = 100;
const MAX_TAGS: usize = 100;

/// Client-caused rejection reasons, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must be 1-100 characters")]
    InvalidTitle,
    #[error("language must be 1-100 characters")]
    InvalidLanguage,
    #[error("filename must be 1-100 characters")]
    InvalidFilename,
    #[error("at most 100 tags are allowed")]
    TooManyTags,
    #[error("no content supplied")]
    EmptyContent,
    #[error("upload quota exceeded")]
    QuotaExceeded,
    #[error("exceeded maximum upload size ({limit_kb}KB)")]
    SizeExceeded { limit_kb: i64 },
}

/// Check the structural fields of an incoming snippet.
///
/// Gates run in a fixed order and fail fast, so the reported reason is
/// deterministic when several fields are bad at once.
pub fn validate_structure(snippet: &NewSnippet) -> Result<(), ValidationError> {
    if !field_len_ok(&snippet.title) {
        return Err(ValidationError::InvalidTitle);
    }
    if !field_len_ok(&snippet.language) {
        return Err(ValidationError::InvalidLanguage);
    }
    if !field_len_ok(&snippet.filename) {
        return Err(ValidationError::InvalidFilename);
    }
    if snippet.tags.len() > MAX_TAGS {
        return Err(ValidationError::TooManyTags);
    }
    if snippet.full_content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}

/// Check a snippet against the quota snapshot returned by a reservation.
///
/// The count gate is strict (`>`): the reservation already incremented
/// `current_amount`, so equality means the slot fit. The size gate is
/// inclusive (`>=`) over the content's UTF-8 byte length.
pub fn validate_against_quota(
    snippet: &NewSnippet,
    quota: &UploadQuota,
) -> Result<(), ValidationError> {
    if quota.current_amount > quota.max_amount {
        return Err(ValidationError::QuotaExceeded);
    }
    if snippet.full_content.len() as i64 >= quota.max_upload_size_kb * 1024 {
        return Err(ValidationError::SizeExceeded {
            limit_kb: quota.max_upload_size_kb,
        });
    }
    Ok(())
}

fn field_len_ok(field: &str) -> bool {
    !field.is_empty() && field.chars().count() <= MAX_FIELD_CHARS
}
