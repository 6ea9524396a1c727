//! Audio stream availability port.

use async_trait::async_trait;
use url::Url;

use crate::domain::AppError;

/// Checks that a live stream answers before the player reports "playing".
#[async_trait]
pub trait StreamProbe: Send + Sync {
    async fn probe(&self, stream_url: &Url) -> Result<(), AppError>;
}
