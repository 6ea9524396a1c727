//! Read-only site content endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::AppError;

/// Content reads the public pages make against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentResource {
    Programs,
    ProgramSchedule,
    LiveBroadcastSchedule,
    ImpactStories,
    MediaVideos,
    MediaPhotos,
    MediaSettings,
    AboutPageSettings,
    MajorGiftsSettings,
    PaymentSettings,
}

impl ContentResource {
    pub const ALL: [ContentResource; 10] = [
        ContentResource::Programs,
        ContentResource::ProgramSchedule,
        ContentResource::LiveBroadcastSchedule,
        ContentResource::ImpactStories,
        ContentResource::MediaVideos,
        ContentResource::MediaPhotos,
        ContentResource::MediaSettings,
        ContentResource::AboutPageSettings,
        ContentResource::MajorGiftsSettings,
        ContentResource::PaymentSettings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            ContentResource::Programs => "/api/programs",
            ContentResource::ProgramSchedule => "/api/programs/schedule",
            ContentResource::LiveBroadcastSchedule => "/api/live-broadcast-schedule",
            ContentResource::ImpactStories => "/api/impact-stories",
            ContentResource::MediaVideos => "/api/media/videos",
            ContentResource::MediaPhotos => "/api/media/photos",
            ContentResource::MediaSettings => "/api/media/settings",
            ContentResource::AboutPageSettings => "/api/about-page-settings",
            ContentResource::MajorGiftsSettings => "/api/major-gifts-settings",
            ContentResource::PaymentSettings => "/api/payment-settings",
        }
    }

    /// Stable name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            ContentResource::Programs => "programs",
            ContentResource::ProgramSchedule => "program-schedule",
            ContentResource::LiveBroadcastSchedule => "live-broadcast-schedule",
            ContentResource::ImpactStories => "impact-stories",
            ContentResource::MediaVideos => "videos",
            ContentResource::MediaPhotos => "photos",
            ContentResource::MediaSettings => "media-settings",
            ContentResource::AboutPageSettings => "about-page-settings",
            ContentResource::MajorGiftsSettings => "major-gifts-settings",
            ContentResource::PaymentSettings => "payment-settings",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, AppError> {
        let wanted = name.trim();
        Self::ALL.into_iter().find(|resource| resource.name() == wanted).ok_or_else(|| {
            AppError::UnknownResource {
                name: wanted.to_string(),
                available: Self::ALL.iter().map(|r| r.name()).collect::<Vec<_>>().join(", "),
            }
        })
    }
}

impl fmt::Display for ContentResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A radio program as listed by `/api/programs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Program {
    pub title: String,
    pub host: Option<String>,
    pub description: Option<String>,
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Accept either a bare array or an object wrapping it under `programs`/`data`.
pub fn parse_programs(body: &Value) -> Result<Vec<Program>, AppError> {
    let list = match body {
        Value::Array(_) => body,
        Value::Object(map) => map
            .get("programs")
            .or_else(|| map.get("data"))
            .ok_or_else(|| AppError::Parse {
                what: "programs".to_string(),
                details: "expected an array or an object with a 'programs' array".to_string(),
            })?,
        _ => {
            return Err(AppError::Parse {
                what: "programs".to_string(),
                details: "unexpected JSON shape".to_string(),
            });
        }
    };

    serde_json::from_value(list.clone())
        .map_err(|e| AppError::Parse { what: "programs".to_string(), details: e.to_string() })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn every_resource_round_trips_through_its_name() {
        for resource in ContentResource::ALL {
            assert_eq!(ContentResource::from_name(resource.name()).unwrap(), resource);
            assert!(resource.path().starts_with("/api/"));
        }
    }

    #[test]
    fn unknown_name_lists_available_resources() {
        let err = ContentResource::from_name("podcasts").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("podcasts"));
        assert!(message.contains("impact-stories"));
    }

    #[test]
    fn parses_bare_and_wrapped_program_lists() {
        let bare = json!([{"title": "Morning Praise", "host": "Esi"}]);
        let wrapped = json!({"programs": [{"title": "Evening Jazz", "start_time": "20:00"}]});

        assert_eq!(parse_programs(&bare).unwrap()[0].host.as_deref(), Some("Esi"));
        assert_eq!(parse_programs(&wrapped).unwrap()[0].start_time.as_deref(), Some("20:00"));
    }

    #[test]
    fn rejects_unexpected_program_shapes() {
        assert!(parse_programs(&json!("nope")).is_err());
        assert!(parse_programs(&json!({"items": []})).is_err());
    }
}
