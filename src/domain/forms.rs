//! Public form kinds, their field sets and backend success contracts.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::AppError;

/// Marker contained in every success message and in no failure message.
pub const SUCCESS_INDICATOR: &str = "Thank you";

/// Forms on the public site that submit to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Contact,
    Donation,
    Pledge,
    Newsletter,
}

/// How the form payload is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding {
    Json,
    Multipart,
}

impl FormKind {
    pub const ALL: [FormKind; 4] =
        [FormKind::Contact, FormKind::Donation, FormKind::Pledge, FormKind::Newsletter];

    pub fn endpoint(&self) -> &'static str {
        match self {
            FormKind::Contact => "/api/contact",
            FormKind::Donation => "/api/donations",
            FormKind::Pledge => "/api/pledges",
            FormKind::Newsletter => "/api/newsletter",
        }
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            FormKind::Contact => &["name", "email", "subject", "message"],
            FormKind::Donation => &["name", "email", "amount"],
            FormKind::Pledge => &["name", "email", "amount"],
            FormKind::Newsletter => &["email"],
        }
    }

    pub fn encoding(&self) -> FormEncoding {
        match self {
            FormKind::Contact => FormEncoding::Multipart,
            _ => FormEncoding::Json,
        }
    }

    pub fn success_policy(&self) -> SuccessPolicy {
        match self {
            FormKind::Contact => SuccessPolicy::SuccessFlag,
            FormKind::Donation => SuccessPolicy::AnySuccessStatus,
            FormKind::Pledge => SuccessPolicy::StatusField,
            FormKind::Newsletter => SuccessPolicy::Lenient,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            FormKind::Contact => "Thank you! Your message has been sent.",
            FormKind::Donation => "Thank you for your donation!",
            FormKind::Pledge => "Thank you for your pledge!",
            FormKind::Newsletter => "Thank you for subscribing!",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormKind::Contact => "contact",
            FormKind::Donation => "donation",
            FormKind::Pledge => "pledge",
            FormKind::Newsletter => "newsletter",
        };
        f.write_str(name)
    }
}

/// How a backend reply is judged successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// 2xx with `{"success": true}`.
    SuccessFlag,
    /// 2xx with `{"status": "success"}`.
    StatusField,
    /// Any 2xx.
    AnySuccessStatus,
    /// Always reported as success, even when the request fails.
    Lenient,
}

#[derive(Deserialize)]
struct SuccessFlagReply {
    #[serde(default)]
    success: bool,
}

#[derive(Deserialize)]
struct StatusFieldReply {
    #[serde(default)]
    status: String,
}

impl SuccessPolicy {
    /// Judge a reply the backend actually sent.
    pub fn accepts(&self, status: u16, body: &[u8]) -> bool {
        let ok_status = (200..300).contains(&status);
        match self {
            SuccessPolicy::SuccessFlag => {
                ok_status
                    && serde_json::from_slice::<SuccessFlagReply>(body)
                        .is_ok_and(|reply| reply.success)
            }
            SuccessPolicy::StatusField => {
                ok_status
                    && serde_json::from_slice::<StatusFieldReply>(body)
                        .is_ok_and(|reply| reply.status == "success")
            }
            SuccessPolicy::AnySuccessStatus => ok_status,
            SuccessPolicy::Lenient => true,
        }
    }

    /// Whether a transport failure is still shown as success.
    pub fn tolerates_transport_failure(&self) -> bool {
        matches!(self, SuccessPolicy::Lenient)
    }
}

/// Free-form field set of a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: BTreeMap<String, String>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Required field names that are absent or blank.
    pub fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.get(name).is_none_or(|value| value.trim().is_empty()))
            .map(|name| name.to_string())
            .collect()
    }

    /// Fail with [`AppError::MissingFields`] when any required field is blank.
    pub fn require(&self, required: &[&str]) -> Result<(), AppError> {
        let missing = self.missing(required);
        if missing.is_empty() { Ok(()) } else { Err(AppError::MissingFields(missing)) }
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> =
            self.values.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect();
        Value::Object(map)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
    }

    /// Parse `name=value` pairs as given on the command line.
    pub fn parse_pairs<I, S>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (name, value) = pair.split_once('=').ok_or_else(|| AppError::Parse {
                what: "form field".to_string(),
                details: format!("expected name=value, got '{}'", pair),
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Parse {
                    what: "form field".to_string(),
                    details: format!("empty field name in '{}'", pair),
                });
            }
            fields.set(name, value);
        }
        Ok(fields)
    }
}

impl From<BTreeMap<String, String>> for FormFields {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}
