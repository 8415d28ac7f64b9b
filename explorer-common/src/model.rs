//! Upstream record models
//!
//! The upstream export is a spreadsheet published as JSON, so field types
//! are loose: counters arrive as numbers or strings (sometimes empty),
//! and the per-hundred failure rate arrives as a string, a number, or a
//! `{"formatted": ...}` object. Deserialization absorbs all of these.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope shared by both upstream endpoints
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<T>>,
}

/// One production test record (one process, one family, one timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Process")]
    pub process: String,
    #[serde(rename = "Family")]
    pub family: String,
    #[serde(rename = "Prime Handle", deserialize_with = "lenient_count", default)]
    pub handle: i64,
    #[serde(rename = "Prime Pass", deserialize_with = "lenient_count", default)]
    pub pass: i64,
    #[serde(rename = "Prime Fail", deserialize_with = "lenient_count", default)]
    pub fail: i64,
    #[serde(rename = "Prime NTF Count", deserialize_with = "lenient_count", default)]
    pub ntf: i64,
    #[serde(
        rename = "Prime Defect Count",
        deserialize_with = "lenient_count",
        default
    )]
    pub defect: i64,
}

/// One failure record (testcode within a process)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub process: String,
    pub testcode: String,
    #[serde(deserialize_with = "lenient_count", default)]
    pub pfail: i64,
    /// Preformatted fails-per-hundred display string, e.g. "2.45%"
    #[serde(deserialize_with = "lenient_rate", default = "default_rate")]
    pub pfailph: String,
    #[serde(deserialize_with = "lenient_count", default)]
    pub pntf: i64,
}

fn default_rate() -> String {
    "0.00%".to_string()
}

/// Parse the leading integer of a string, ignoring surrounding whitespace
/// and trailing garbage. Anything without a leading integer is 0.
pub fn parse_count(s: &str) -> i64 {
    let s = s.trim();
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if i == 0 && (c == '-' || c == '+') {
            end = i + c.len_utf8();
            continue;
        }
        if c.is_ascii_digit() {
            end = i + 1;
        } else {
            break;
        }
    }
    s[..end].parse().unwrap_or(0)
}

/// Counter field: JSON number, numeric string, or anything else (→ 0)
fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_count(&s),
        _ => 0,
    })
}

/// Rate field: string as-is, bare number formatted to two decimals,
/// or an object carrying a `formatted` member
fn lenient_rate<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => s,
        Value::Number(n) => format!("{:.2}%", n.as_f64().unwrap_or(0.0)),
        Value::Object(map) => match map.get("formatted").and_then(|v| v.as_str()) {
            Some(s) => s.to_string(),
            None => default_rate(),
        },
        _ => default_rate(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counts_from_numbers_and_strings() {
        let json = r#"{
            "Date": "2025-03-14T08:00:00Z",
            "Process": "UCT",
            "Family": "EXPLORER",
            "Prime Handle": 120,
            "Prime Pass": "118",
            "Prime Fail": "2 units",
            "Prime NTF Count": "",
            "Prime Defect Count": null
        }"#;
        let rec: ProductionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.handle, 120);
        assert_eq!(rec.pass, 118);
        assert_eq!(rec.fail, 2);
        assert_eq!(rec.ntf, 0);
        assert_eq!(rec.defect, 0);
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let json = r#"{
            "Date": "2025-03-14",
            "Process": "CFC",
            "Family": "EXPLORER"
        }"#;
        let rec: ProductionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.handle, 0);
        assert_eq!(rec.pass, 0);
    }

    #[test]
    fn parse_count_handles_signs_and_garbage() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("  42  "), 42);
        assert_eq!(parse_count("-7"), -7);
        assert_eq!(parse_count("+3"), 3);
        assert_eq!(parse_count("12abc"), 12);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn pfailph_accepts_string_number_and_object() {
        let as_string: FailureRecord = serde_json::from_str(
            r#"{"process":"UCT","testcode":"T1","pfail":5,"pfailph":"2.45%","pntf":1}"#,
        )
        .unwrap();
        assert_eq!(as_string.pfailph, "2.45%");

        let as_number: FailureRecord = serde_json::from_str(
            r#"{"process":"UCT","testcode":"T1","pfail":5,"pfailph":2.451,"pntf":1}"#,
        )
        .unwrap();
        assert_eq!(as_number.pfailph, "2.45%");

        let as_object: FailureRecord = serde_json::from_str(
            r#"{"process":"UCT","testcode":"T1","pfail":5,"pfailph":{"formatted":"3.10%"},"pntf":1}"#,
        )
        .unwrap();
        assert_eq!(as_object.pfailph, "3.10%");

        let as_null: FailureRecord = serde_json::from_str(
            r#"{"process":"UCT","testcode":"T1","pfail":5,"pfailph":null,"pntf":1}"#,
        )
        .unwrap();
        assert_eq!(as_null.pfailph, "0.00%");
    }

    #[test]
    fn envelope_deserializes() {
        let json = r#"{"success": true, "data": [
            {"process":"UCT","testcode":"T1","pfail":5,"pfailph":"1.00%","pntf":0}
        ]}"#;
        let env: ApiEnvelope<FailureRecord> = serde_json::from_str(json).unwrap();
        assert!(env.success);
        assert_eq!(env.data.unwrap().len(), 1);
    }
}
