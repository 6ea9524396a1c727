//! Simple content reads for the public pages.

use serde_json::Value;

use crate::domain::{AppError, ContentResource};
use crate::ports::SiteBackend;

/// Fetch one content resource as raw JSON.
pub async fn fetch_content<B: SiteBackend + ?Sized>(
    backend: &B,
    resource: ContentResource,
) -> Result<Value, AppError> {
    backend.get_json(resource.path()).await
}
