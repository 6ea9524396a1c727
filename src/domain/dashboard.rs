//! Presenter dashboard entries and feed snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{AppError, FormFields};

/// Kinds of entries a presenter submits from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Testimony,
    CallLog,
}

impl EntryKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            EntryKind::Testimony => "/api/dashboard/testimony",
            EntryKind::CallLog => "/api/dashboard/call-log",
        }
    }

    /// Local store key holding the cached list.
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntryKind::Testimony => "dashboard_testimonies",
            EntryKind::CallLog => "dashboard_call_logs",
        }
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EntryKind::Testimony => &["name", "testimony"],
            EntryKind::CallLog => &["caller_name", "reason"],
        }
    }

    pub fn parse(name: &str) -> Result<Self, AppError> {
        match name.trim() {
            "testimony" | "testimonies" => Ok(EntryKind::Testimony),
            "call-log" | "call-logs" | "call_log" => Ok(EntryKind::CallLog),
            other => Err(AppError::Validation(format!(
                "Invalid entry kind '{}': must be 'testimony' or 'call-log'",
                other
            ))),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Testimony => f.write_str("testimony"),
            EntryKind::CallLog => f.write_str("call-log"),
        }
    }
}

/// A submitted testimony or call log as cached on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardEntry {
    pub id: String,
    #[serde(rename = "submittedAt", with = "crate::domain::timestamp")]
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl DashboardEntry {
    pub fn new(id: String, submitted_at: DateTime<Utc>, fields: FormFields) -> Self {
        let mut fields = fields.into_map();
        // Reserved keys belong to the entry itself.
        fields.remove("id");
        fields.remove("submittedAt");
        Self { id, submitted_at, fields }
    }

    /// Request payload: user fields plus `id` and `submittedAt`.
    pub fn to_payload(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Issues timestamp-derived entry ids that never repeat within one generator.
///
/// The id is the submission time in epoch milliseconds; two submissions in the
/// same millisecond get consecutive values.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    last: AtomicI64,
}

impl EntryIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from ids already present so reloaded caches keep unique ids.
    pub fn seeded<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a DashboardEntry>,
    {
        let last = existing.into_iter().filter_map(|entry| entry.id.parse::<i64>().ok()).max();
        Self { last: AtomicI64::new(last.unwrap_or(0)) }
    }

    pub fn next_id(&self, at: DateTime<Utc>) -> String {
        let millis = at.timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(millis.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|current| current);
        millis.max(previous.saturating_add(1)).to_string()
    }
}

/// Read-only dashboard feeds as last fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub weather: Option<Value>,
    pub weather_updated_at: Option<DateTime<Utc>>,
    pub schedule: Option<Value>,
    pub presenters: Option<Value>,
}

/// Dashboard read feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardFeed {
    Weather,
    Schedule,
    Presenters,
}

impl DashboardFeed {
    pub fn endpoint(&self) -> &'static str {
        match self {
            DashboardFeed::Weather => "/api/dashboard/weather",
            DashboardFeed::Schedule => "/api/dashboard/schedule",
            DashboardFeed::Presenters => "/api/dashboard/presenters",
        }
    }
}

pub const DASHBOARD_EXPORT_ENDPOINT: &str = "/api/dashboard/export";

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn ids_are_unique_within_same_millisecond() {
        let ids = EntryIdGenerator::new();
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let generated: Vec<String> = (0..5).map(|_| ids.next_id(at)).collect();

        assert_eq!(generated[0], "1700000000000");
        assert_eq!(generated[4], "1700000000004");
        assert_eq!(generated.iter().collect::<HashSet<_>>().len(), 5);
    }

    #[test]
    fn ids_follow_the_clock_when_it_moves_forward() {
        let ids = EntryIdGenerator::new();
        let first = ids.next_id(Utc.timestamp_millis_opt(1_000).unwrap());
        let second = ids.next_id(Utc.timestamp_millis_opt(5_000).unwrap());
        assert_eq!(first, "1000");
        assert_eq!(second, "5000");
    }

    #[test]
    fn seeded_generator_skips_existing_ids() {
        let at = Utc.timestamp_millis_opt(2_000).unwrap();
        let existing = vec![DashboardEntry::new("2000".into(), at, FormFields::new())];
        let ids = EntryIdGenerator::seeded(&existing);
        assert_eq!(ids.next_id(at), "2001");
    }

    #[test]
    fn entry_serializes_camel_case_with_flattened_fields() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap();
        let entry = DashboardEntry::new(
            "42".into(),
            at,
            FormFields::new().with("name", "Grace").with("testimony", "Blessed"),
        );
        let json = entry.to_payload().unwrap();

        assert_eq!(json["id"], "42");
        assert_eq!(json["submittedAt"], "2024-03-09T08:00:00.000Z");
        assert_eq!(json["name"], "Grace");

        let back: DashboardEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn entry_kind_parses_cli_names() {
        assert_eq!(EntryKind::parse("testimony").unwrap(), EntryKind::Testimony);
        assert_eq!(EntryKind::parse("call-log").unwrap(), EntryKind::CallLog);
        assert!(EntryKind::parse("memo").is_err());
    }
}
