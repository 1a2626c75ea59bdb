pub mod preview;
pub mod quota;
pub mod record;
pub mod store;
pub mod upload;
pub mod validate;

pub use quota::UploadQuota;
pub use record::{FullSnippet, NewSnippet, SnippetListing};
pub use validate::ValidationError;
