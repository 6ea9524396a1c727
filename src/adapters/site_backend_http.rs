//! Station backend client implementation using reqwest.

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::Form;
use url::Url;

use async_trait::async_trait;

use crate::domain::{AppError, BackendConfig};
use crate::ports::{ApiRequest, ApiResponse, Method, RequestBody, SiteBackend};

/// HTTP transport for the station backend.
///
/// One request per call: no retries, no batching. The only time bound is the
/// client-wide timeout from [`BackendConfig`].
#[derive(Debug, Clone)]
pub struct HttpSiteBackend {
    base_url: Url,
    client: Client,
}

impl HttpSiteBackend {
    /// Create a new HTTP client for the configured base URL.
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("onair/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http(format!("Failed to create HTTP client: {}", e), None))?;

        Ok(Self { base_url: with_trailing_slash(config.api_url.clone()), client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base_url.join(path.trim_start_matches('/')).map_err(|e| AppError::Parse {
            what: format!("endpoint '{}'", path),
            details: e.to_string(),
        })
    }
}

/// `Url::join` replaces the last segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl SiteBackend for HttpSiteBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let url = self.endpoint(&request.path)?;

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let builder = builder.header(ACCEPT, HeaderValue::from_static("application/json"));
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(fields) => {
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value));
                builder.multipart(form)
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::http(format!("HTTP request failed: {}", e), None))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            AppError::http(format!("Failed to read response body: {}", e), Some(status))
        })?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
