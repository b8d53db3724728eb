// libs/voice-cell/src/services/coerce.rs
//
// Coercion helpers for the loosely-typed arguments the voice platform
// sends: numbers and booleans may arrive as strings, ids as strings, and
// timestamps as ISO-8601 text with an optional trailing literal "Z".

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::ToolError;

/// Arguments may be an object or a JSON-encoded string of one; anything
/// else coerces to an empty map.
pub fn as_arguments(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// Parse ISO-8601, accepting a trailing `Z` and naive timestamps, both
/// read as UTC.
pub fn parse_iso(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty datetime string".to_string());
    }

    let normalized = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    Err(format!("Invalid datetime: {}", s))
}

fn field_str(args: &Map<String, Value>, key: &str) -> Option<String> {
    match args.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

pub fn req_uuid(args: &Map<String, Value>, key: &str) -> Result<Uuid, ToolError> {
    let raw = field_str(args, key)
        .ok_or_else(|| ToolError::bad_request(format!("{} is required", key)))?;
    Uuid::parse_str(raw.trim())
        .map_err(|_| ToolError::bad_request(format!("{} must be a valid id", key)))
}

pub fn opt_uuid(args: &Map<String, Value>, key: &str) -> Result<Option<Uuid>, ToolError> {
    match field_str(args, key) {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(|_| ToolError::bad_request(format!("{} must be a valid id", key))),
    }
}

pub fn req_datetime(args: &Map<String, Value>, key: &str) -> Result<DateTime<Utc>, ToolError> {
    let raw = field_str(args, key)
        .ok_or_else(|| ToolError::bad_request(format!("{} is required", key)))?;
    parse_iso(&raw).map_err(ToolError::bad_request)
}

pub fn opt_datetime(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Option<DateTime<Utc>>, ToolError> {
    match field_str(args, key) {
        None => Ok(None),
        Some(raw) => parse_iso(&raw).map(Some).map_err(ToolError::bad_request),
    }
}

pub fn opt_str(args: &Map<String, Value>, key: &str) -> Option<String> {
    field_str(args, key)
}

/// Booleans arrive as native bools or as truthy/falsy words.
pub fn opt_bool(args: &Map<String, Value>, key: &str, default: bool) -> bool {
    match args.get(key) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            let s = match other {
                Value::String(s) => s.clone(),
                v => v.to_string(),
            };
            match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "on" => true,
                "false" | "0" | "no" | "n" | "off" => false,
                _ => default,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn args(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn arguments_accept_object_or_encoded_string() {
        let direct = as_arguments(&json!({"a": 1}));
        assert_eq!(direct.get("a"), Some(&json!(1)));

        let encoded = as_arguments(&json!("{\"a\": 1}"));
        assert_eq!(encoded.get("a"), Some(&json!(1)));

        assert!(as_arguments(&json!(42)).is_empty());
        assert!(as_arguments(&json!("not json")).is_empty());
    }

    #[test]
    fn parse_iso_accepts_trailing_z() {
        let dt = parse_iso("2025-06-02T09:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn parse_iso_accepts_offset_and_naive() {
        let offset = parse_iso("2025-06-02T11:00:00+02:00").unwrap();
        assert_eq!(offset, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());

        let naive = parse_iso("2025-06-02T09:00:00").unwrap();
        assert_eq!(naive, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn parse_iso_rejects_junk() {
        assert!(parse_iso("").is_err());
        assert!(parse_iso("   ").is_err());
        assert!(parse_iso("tomorrow at nine").is_err());
    }

    #[test]
    fn uuids_coerce_from_strings() {
        let id = Uuid::new_v4();
        let a = args(json!({ "patient_id": id.to_string() }));
        assert_eq!(req_uuid(&a, "patient_id").unwrap(), id);

        let missing = args(json!({}));
        let err = req_uuid(&missing, "patient_id").unwrap_err();
        assert_eq!(err.code, 400);
        assert_eq!(err.message, "patient_id is required");

        let bad = args(json!({ "patient_id": "12345" }));
        assert_eq!(req_uuid(&bad, "patient_id").unwrap_err().code, 400);
    }

    #[test]
    fn optional_uuid_distinguishes_absent_and_invalid() {
        let absent = args(json!({}));
        assert_eq!(opt_uuid(&absent, "facility_id").unwrap(), None);

        let null = args(json!({ "facility_id": null }));
        assert_eq!(opt_uuid(&null, "facility_id").unwrap(), None);

        let invalid = args(json!({ "facility_id": "nope" }));
        assert!(opt_uuid(&invalid, "facility_id").is_err());
    }

    #[test]
    fn bools_coerce_from_words_and_numbers() {
        let a = args(json!({
            "a": true, "b": "false", "c": "YES", "d": "0", "e": 1, "f": "maybe"
        }));
        assert!(opt_bool(&a, "a", false));
        assert!(!opt_bool(&a, "b", true));
        assert!(opt_bool(&a, "c", false));
        assert!(!opt_bool(&a, "d", true));
        assert!(opt_bool(&a, "e", false));
        // Unrecognised words fall back to the default.
        assert!(opt_bool(&a, "f", true));
        assert!(opt_bool(&a, "missing", true));
    }
}
