use reqwest::Client;
use url::Url;

use async_trait::async_trait;

use crate::domain::{AppError, BackendConfig};
use crate::ports::StreamProbe;

/// Probes a stream by opening it and checking the response status.
///
/// Only the headers are awaited; the (endless) audio body is dropped unread.
#[derive(Debug, Clone)]
pub struct HttpStreamProbe {
    client: Client,
}

impl HttpStreamProbe {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| AppError::http(format!("Failed to create HTTP client: {}", e), None))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StreamProbe for HttpStreamProbe {
    async fn probe(&self, stream_url: &Url) -> Result<(), AppError> {
        let response = self
            .client
            .get(stream_url.clone())
            .send()
            .await
            .map_err(|e| AppError::http(format!("Stream unreachable: {}", e), None))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AppError::http(format!("Stream answered {}", status), Some(status.as_u16())))
        }
    }
}
