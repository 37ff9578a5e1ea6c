use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One loosely typed value as delivered by the feed endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl RawValue {
    /// Coerces the value to a trimmed, non-empty string.
    ///
    /// Lists are joined with `,` so that array-valued team fields still split
    /// the same way as delimited strings. Objects carry no usable text.
    pub fn to_clean_text(&self) -> Option<String> {
        let text = match self {
            RawValue::Null | RawValue::Object(_) => return None,
            RawValue::Bool(value) => value.to_string(),
            RawValue::Number(value) => format_number(*value)?,
            RawValue::Text(value) => value.clone(),
            RawValue::List(items) => items
                .iter()
                .map(|item| item.to_clean_text().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Coerces the value to a finite number the way JavaScript's `Number()`
    /// does, except that blank strings are not numbers. Booleans count as 1/0.
    pub fn to_finite_number(&self) -> Option<f64> {
        let number = match self {
            RawValue::Number(value) => *value,
            RawValue::Bool(value) => f64::from(u8::from(*value)),
            RawValue::Text(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            _ => return None,
        };
        number.is_finite().then_some(number)
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

/// Formats a number like JavaScript's `String()`: no negative zero, and
/// exponent notation outside `[1e-6, 1e21)`.
fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 {
        return Some(format!("{value:e}").replacen('e', "e+", 1));
    }
    if magnitude < 1e-6 {
        return Some(format!("{value:e}"));
    }
    Some(value.to_string())
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// An untyped feed row: field name to loosely typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(BTreeMap<String, RawValue>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts one element of the feed's `rows` array. Anything that is not
    /// a JSON object yields an empty row.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    News,
    Result,
    Training,
    Unknown,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::News => "news",
            FeedKind::Result => "result",
            FeedKind::Training => "training",
            FeedKind::Unknown => "unknown",
        }
    }
}

/// A normalized feed entry. Optional strings are never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRow {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub raw_type: Option<String>,
    pub kind: FeedKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<String>,
    pub teams: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_accepts_mixed_value_shapes() {
        let value = serde_json::json!({
            "id": "p1",
            "homeScore": 3,
            "published": true,
            "teams": ["Damen", null],
            "meta": {"a": 1},
            "venue": null
        });
        let row = RawRow::from_value(value);

        assert_eq!(row.get("id"), Some(&RawValue::Text("p1".to_string())));
        assert_eq!(row.get("homeScore"), Some(&RawValue::Number(3.0)));
        assert_eq!(row.get("published"), Some(&RawValue::Bool(true)));
        assert_eq!(row.get("venue"), Some(&RawValue::Null));
        assert!(matches!(row.get("meta"), Some(RawValue::Object(_))));
        assert!(matches!(row.get("teams"), Some(RawValue::List(items)) if items.len() == 2));
    }

    #[test]
    fn non_object_rows_become_empty() {
        assert_eq!(RawRow::from_value(serde_json::json!("p1")), RawRow::new());
        assert_eq!(RawRow::from_value(serde_json::Value::Null), RawRow::new());
        assert_eq!(RawRow::from_value(serde_json::json!([1, 2])), RawRow::new());
    }

    #[test]
    fn text_coercion_trims_and_formats_scalars() {
        assert_eq!(RawValue::from("  Halle Nord ").to_clean_text().as_deref(), Some("Halle Nord"));
        assert_eq!(RawValue::from("   ").to_clean_text(), None);
        assert_eq!(RawValue::Number(12.0).to_clean_text().as_deref(), Some("12"));
        assert_eq!(RawValue::Number(1.5).to_clean_text().as_deref(), Some("1.5"));
        assert_eq!(RawValue::Bool(false).to_clean_text().as_deref(), Some("false"));
        assert_eq!(RawValue::Number(-0.0).to_clean_text().as_deref(), Some("0"));
        assert_eq!(RawValue::Number(1e21).to_clean_text().as_deref(), Some("1e+21"));
        assert_eq!(RawValue::Number(-2.5e22).to_clean_text().as_deref(), Some("-2.5e+22"));
        assert_eq!(RawValue::Number(1e-7).to_clean_text().as_deref(), Some("1e-7"));
        assert_eq!(RawValue::Null.to_clean_text(), None);
        assert_eq!(
            RawValue::List(vec!["Damen".into(), "U14 offen".into()])
                .to_clean_text()
                .as_deref(),
            Some("Damen,U14 offen")
        );
    }

    #[test]
    fn number_coercion_rejects_blank_and_non_finite() {
        assert_eq!(RawValue::from(" 42 ").to_finite_number(), Some(42.0));
        assert_eq!(RawValue::from("1e2").to_finite_number(), Some(100.0));
        assert_eq!(RawValue::from("").to_finite_number(), None);
        assert_eq!(RawValue::from("drei").to_finite_number(), None);
        assert_eq!(RawValue::from("inf").to_finite_number(), None);
        assert_eq!(RawValue::Number(f64::NAN).to_finite_number(), None);
        assert_eq!(RawValue::Bool(true).to_finite_number(), Some(1.0));
        assert_eq!(RawValue::Bool(false).to_finite_number(), Some(0.0));
        assert_eq!(RawValue::Null.to_finite_number(), None);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let encoded = serde_json::to_string(&FeedKind::Training).expect("kind must serialize");
        assert_eq!(encoded, "\"training\"");
    }
}
