//! Raw sender records as served by `/api/marketing/senders` and the display
//! rows they normalize into.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike as _, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Placeholder for absent text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for an absent creator and for notifications about nameless senders.
pub const UNKNOWN: &str = "Unknown";

/// Opaque sender identifier, kept as the API sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SenderId {
    Number(i64),
    Text(String),
    /// The record had no usable `id`.
    Missing,
}

impl SenderId {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n
                .as_i64()
                .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            Some(Value::String(s)) => Self::Text(s.clone()),
            _ => Self::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

impl FromStr for SenderId {
    type Err = Infallible;

    /// Integers become [`SenderId::Number`], anything else [`SenderId::Text`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_not_int| Self::Text(s.to_owned()), Self::Number))
    }
}

/// One element of the `data` array, with no shape guarantees.
///
/// Anything that is not a JSON object behaves like an object with every
/// field absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct SenderRecord {
    fields: Map<String, Value>,
}

impl From<Value> for SenderRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

impl SenderRecord {
    /// Present, "truthy" text: empty strings and zero count as absent, other
    /// numbers keep their JSON text.
    fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if !is_zero(n) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_owned()),
            _ => None,
        }
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// Normalizes using the local time zone for `createdOn`.
    pub fn normalize(&self) -> SenderRow {
        self.normalize_in(&Local)
    }

    /// Normalizes, converting `createdOn` instants into `tz` before taking the
    /// calendar date.
    pub fn normalize_in<Tz: TimeZone>(&self, tz: &Tz) -> SenderRow {
        let or_placeholder =
            |key: &str, placeholder: &str| self.text(key).unwrap_or_else(|| placeholder.to_owned());

        SenderRow {
            id: SenderId::from_value(self.fields.get("id")),
            from_name: or_placeholder("fromName", NOT_AVAILABLE),
            from_email: or_placeholder("fromEmail", NOT_AVAILABLE),
            reply_to: or_placeholder("replyToEmail", NOT_AVAILABLE),
            created_by: or_placeholder("userName", UNKNOWN),
            created_on: self
                .fields
                .get("createdOn")
                .and_then(|v| created_on_date(v, tz))
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |d| short_date(&d)),
            domain_verified: self.flag("domainVerified").unwrap_or(false),
            verified: self.flag("senderAuthorised").unwrap_or(false),
        }
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64().is_some_and(|f| f == 0.0)
}

/// Calendar date of a `createdOn` value.
///
/// Offset-carrying timestamps and epoch milliseconds are instants and get
/// converted into `tz`; naive date-times and plain dates are taken as written.
fn created_on_date<Tz: TimeZone>(value: &Value, tz: &Tz) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(tz).date_naive())
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
                return Some(instant.with_timezone(tz).date_naive());
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.date())
                .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        }
        _ => None,
    }
}

/// `M/D/YYYY`, the short date layout of the en-US locale.
fn short_date(date: &NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Display-ready sender. Every field holds a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderRow {
    pub id: SenderId,
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub created_by: String,
    pub created_on: String,
    pub domain_verified: bool,
    pub verified: bool,
}

impl SenderRow {
    /// Name used in notifications: `from_name`, or `"Unknown"` when the record
    /// had none.
    pub fn display_name(&self) -> &str {
        if self.from_name == NOT_AVAILABLE {
            UNKNOWN
        } else {
            &self.from_name
        }
    }
}

/// Body of `GET /api/marketing/senders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSendersResponse {
    #[serde(default)]
    pub data: Option<Vec<SenderRecord>>,
}

impl ListSendersResponse {
    /// Normalizes every record in order; absent `data` yields no rows.
    pub fn into_rows_in<Tz: TimeZone>(self, tz: &Tz) -> Vec<SenderRow> {
        self.data
            .unwrap_or_default()
            .iter()
            .map(|record| record.normalize_in(tz))
            .collect()
    }
}
