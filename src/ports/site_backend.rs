//! Station backend port definition.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::AppError;

const DEFAULT_STATUS_MESSAGE: &str = "Backend request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// Body of a backend request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Text parts of a `multipart/form-data` body, in field order.
    Multipart(Vec<(String, String)>),
}

/// A request against a path under the configured API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: RequestBody::Empty }
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Post, path: path.into(), body: RequestBody::Json(body) }
    }

    pub fn post_multipart(path: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self { method: Method::Post, path: path.into(), body: RequestBody::Multipart(fields) }
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Whatever the backend answered, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx reply into [`AppError::Http`].
    pub fn error_for_status(self) -> Result<Self, AppError> {
        if self.is_success() {
            return Ok(self);
        }

        let body_text = String::from_utf8_lossy(&self.body);
        let message = extract_error_message(&body_text).unwrap_or_else(|| {
            if !body_text.trim().is_empty() {
                body_text.trim().to_string()
            } else if self.status >= 500 {
                "Server error".to_string()
            } else {
                DEFAULT_STATUS_MESSAGE.to_string()
            }
        });
        Err(AppError::http(message, Some(self.status)))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_slice(&self.body).map_err(|e| AppError::Parse {
            what: "backend response".to_string(),
            details: e.to_string(),
        })
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    parsed
        .get("message")
        .or_else(|| parsed.get("error"))
        .and_then(|message| message.as_str())
        .map(ToOwned::to_owned)
}

/// Port for the station's REST backend.
///
/// `Err` means the request never produced a reply (transport failure); any HTTP
/// status, including errors, comes back as `Ok`.
#[async_trait]
pub trait SiteBackend: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError>;

    /// GET a path and decode a successful JSON reply.
    async fn get_json(&self, path: &str) -> Result<Value, AppError> {
        self.send(ApiRequest::get(path)).await?.error_for_status()?.json()
    }
}

#[async_trait]
impl<T: SiteBackend + ?Sized> SiteBackend for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_for_status_passes_success_through() {
        let response = ApiResponse::new(201, b"{}".to_vec());
        assert!(response.error_for_status().is_ok());
    }

    #[test]
    fn error_for_status_prefers_nested_message() {
        let response = ApiResponse::new(422, br#"{"error":{"message":"amount too small"}}"#.to_vec());
        match response.error_for_status().unwrap_err() {
            AppError::Http { message, status } => {
                assert_eq!(message, "amount too small");
                assert_eq!(status, Some(422));
            }
            other => panic!("unexpected error variant: {}", other),
        }
    }

    #[test]
    fn error_for_status_falls_back_by_status_class() {
        let err = ApiResponse::new(503, Vec::new()).error_for_status().unwrap_err();
        assert!(matches!(err, AppError::Http { ref message, .. } if message == "Server error"));

        let err = ApiResponse::new(404, Vec::new()).error_for_status().unwrap_err();
        assert!(
            matches!(err, AppError::Http { ref message, .. } if message == DEFAULT_STATUS_MESSAGE)
        );
    }

    #[test]
    fn json_decodes_body() {
        let response = ApiResponse::new(200, br#"{"temp": 31}"#.to_vec());
        let value: Value = response.json().unwrap();
        assert_eq!(value["temp"], 31);
    }
}
