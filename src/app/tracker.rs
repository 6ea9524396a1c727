//! Best-effort visitor and click tracking.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::domain::{ClickEvent, ClickPosition, ElementDescriptor, PageSnapshot, VisitorEvent};
use crate::ports::{ApiRequest, SiteBackend};

pub const TRACK_VISITOR_ENDPOINT: &str = "/api/track-visitor";
pub const TRACK_CLICK_ENDPOINT: &str = "/api/track-click";

/// Fire-and-forget telemetry sender.
///
/// Every failure is logged at debug level and dropped: tracking never returns
/// an error to the caller, never retries and never batches.
pub struct Tracker<B: SiteBackend> {
    backend: Arc<B>,
}

impl<B: SiteBackend> Clone for Tracker<B> {
    fn clone(&self) -> Self {
        Self { backend: Arc::clone(&self.backend) }
    }
}

impl<B: SiteBackend + 'static> Tracker<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Record one route change. Returns whether the backend accepted it.
    pub async fn track_visit(&self, page: &PageSnapshot) -> bool {
        let event = match VisitorEvent::capture(page, Utc::now()) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(error = %err, "visit not tracked");
                return false;
            }
        };
        self.post(TRACK_VISITOR_ENDPOINT, &event).await
    }

    /// Record one click. Non-qualifying targets issue no request and return `false`.
    pub async fn track_click(
        &self,
        target: &ElementDescriptor,
        page_url: &str,
        position: ClickPosition,
    ) -> bool {
        match ClickEvent::capture(target, page_url, position, Utc::now()) {
            Some(event) => self.post(TRACK_CLICK_ENDPOINT, &event).await,
            None => false,
        }
    }

    /// Detach [`Tracker::track_visit`] onto the runtime.
    pub fn spawn_visit(&self, page: PageSnapshot) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            tracker.track_visit(&page).await;
        })
    }

    /// Detach [`Tracker::track_click`]; `None` when the target does not qualify.
    pub fn spawn_click(
        &self,
        target: &ElementDescriptor,
        page_url: &str,
        position: ClickPosition,
    ) -> Option<JoinHandle<()>> {
        let event = ClickEvent::capture(target, page_url, position, Utc::now())?;
        let tracker = self.clone();
        Some(tokio::spawn(async move {
            tracker.post(TRACK_CLICK_ENDPOINT, &event).await;
        }))
    }

    async fn post<T: Serialize>(&self, path: &str, event: &T) -> bool {
        let body = match serde_json::to_value(event) {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(path, error = %err, "tracking payload not serializable");
                return false;
            }
        };

        match self.backend.send(ApiRequest::post_json(path, body)).await {
            Ok(response) if response.is_success() => true,
            Ok(response) => {
                tracing::debug!(path, status = response.status, "tracking rejected");
                false
            }
            Err(err) => {
                tracing::debug!(path, error = %err, "tracking failed");
                false
            }
        }
    }
}
