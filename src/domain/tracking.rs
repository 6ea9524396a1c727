//! Visitor and click telemetry payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Maximum number of characters of element text carried by a click event.
pub const MAX_ELEMENT_TEXT_CHARS: usize = 100;

/// Class name that opts an arbitrary element into click tracking.
pub const CLICKABLE_CLASS: &str = "clickable";

const INTERACTIVE_TAGS: [&str; 3] = ["a", "button", "input"];

/// Browser and document state observed at navigation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub page_url: String,
    pub user_agent: String,
    /// Empty for direct visits.
    pub referrer: String,
    /// `"{width}x{height}"` of the screen.
    pub screen_resolution: String,
    /// `"{width}x{height}"` of the viewport.
    pub viewport_size: String,
}

impl PageSnapshot {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self { page_url: page_url.into(), ..Default::default() }
    }
}

/// One navigation, posted to `/api/track-visitor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorEvent {
    pub page_url: String,
    pub user_agent: String,
    pub referrer: String,
    pub screen_resolution: String,
    pub viewport_size: String,
    #[serde(with = "crate::domain::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl VisitorEvent {
    /// Build the event for a route change. A page without a URL is not trackable.
    pub fn capture(page: &PageSnapshot, at: DateTime<Utc>) -> Result<Self, AppError> {
        let page_url = page.page_url.trim();
        if page_url.is_empty() {
            return Err(AppError::Validation("page_url must not be empty".to_string()));
        }

        Ok(Self {
            page_url: page_url.to_string(),
            user_agent: page.user_agent.clone(),
            referrer: page.referrer.clone(),
            screen_resolution: page.screen_resolution.clone(),
            viewport_size: page.viewport_size.clone(),
            timestamp: at,
        })
    }
}

/// Minimal description of a click target, enough to decide whether it is tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDescriptor {
    pub tag: String,
    pub id: String,
    pub classes: Vec<String>,
    pub role: Option<String>,
    pub has_click_handler: bool,
    pub text: String,
}

impl ElementDescriptor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Default::default() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add classes from a whitespace-separated `class` attribute.
    pub fn with_class_attr(mut self, class_attr: &str) -> Self {
        self.classes.extend(class_attr.split_whitespace().map(ToOwned::to_owned));
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_click_handler(mut self) -> Self {
        self.has_click_handler = true;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Whether a click on `element` produces a [`ClickEvent`].
///
/// Qualifying targets are anchors, buttons, inputs, anything with
/// `role="button"`, anything with a click handler, and anything carrying the
/// `clickable` class.
pub fn is_trackable_click(element: &ElementDescriptor) -> bool {
    let tag = element.tag.trim();
    INTERACTIVE_TAGS.iter().any(|candidate| tag.eq_ignore_ascii_case(candidate))
        || element.role.as_deref().is_some_and(|role| role.trim().eq_ignore_ascii_case("button"))
        || element.has_click_handler
        || element.classes.iter().any(|class| class == CLICKABLE_CLASS)
}

/// Trim and cap element text at [`MAX_ELEMENT_TEXT_CHARS`] characters.
pub fn truncate_element_text(text: &str) -> String {
    text.trim().chars().take(MAX_ELEMENT_TEXT_CHARS).collect()
}

/// Viewport coordinates of a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickPosition {
    pub x: i32,
    pub y: i32,
}

/// One qualifying click, posted to `/api/track-click`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub element_type: String,
    pub element_id: String,
    pub element_class: String,
    pub element_text: String,
    pub page_url: String,
    pub click_position: ClickPosition,
    #[serde(with = "crate::domain::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl ClickEvent {
    /// Build the event for a click, or `None` when the target does not qualify.
    pub fn capture(
        element: &ElementDescriptor,
        page_url: &str,
        position: ClickPosition,
        at: DateTime<Utc>,
    ) -> Option<Self> {
        if !is_trackable_click(element) {
            return None;
        }

        Some(Self {
            element_type: element.tag.trim().to_ascii_lowercase(),
            element_id: element.id.clone(),
            element_class: element.classes.join(" "),
            element_text: truncate_element_text(&element.text),
            page_url: page_url.to_string(),
            click_position: position,
            timestamp: at,
        })
    }
}
