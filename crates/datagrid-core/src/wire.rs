//! Versioned JSON boundary for truncate requests and responses.
//!
//! The core only sees typed values; this module is the single place where
//! raw wire text is parsed or produced. Parsing is strict about shape so
//! that malformed clients get a precise message instead of a serde dump.

use serde::Serialize;
use serde_json::Value;

use crate::request::TruncateRequest;
use crate::{Error, Result};

/// Wire protocol version this module understands.
pub const WIRE_VERSION: u64 = 1;

/// Parse a wire request.
///
/// Accepted shape:
/// `{"path": "...", "length": N, "target_resource"?: "...",
///   "replica_number"?: N, "resource_hierarchy"?: "...",
///   "admin_mode"?: bool, "version"?: N}`
pub fn parse_request(input: &str) -> Result<TruncateRequest> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| Error::InvalidInput(format!("Failed to parse input to JSON. [{}]", e)))?;

    let object = value.as_object().ok_or_else(|| {
        Error::InvalidInput(format!(
            "Expected input to be a JSON object. Received input: [{}]",
            input
        ))
    })?;

    if let Some(version) = object.get("version").filter(|v| !v.is_null()) {
        match version.as_u64() {
            Some(WIRE_VERSION) => {}
            _ => {
                return Err(Error::InvalidInput(format!(
                    "Unsupported wire version: [{}]",
                    version
                )))
            }
        }
    }

    // path and length are required. A null member counts as missing.
    let path = match object.get("path").filter(|v| !v.is_null()) {
        Some(Value::String(path)) => path.clone(),
        Some(other) => {
            return Err(Error::InvalidInput(format!(
                "Unexpected type in JSON input: ['path' is {}]",
                type_name(other)
            )))
        }
        None => return Err(Error::InvalidInput("Input is missing 'path' key.".to_string())),
    };

    let length = match object.get("length").filter(|v| !v.is_null()) {
        Some(value) => value.as_i64().ok_or_else(|| {
            Error::InvalidInput(format!(
                "Unexpected type in JSON input: ['length' is {}]",
                type_name(value)
            ))
        })?,
        None => {
            return Err(Error::InvalidInput(
                "Input is missing 'length' key.".to_string(),
            ))
        }
    };

    let target_resource = optional_string(object, "target_resource")?;
    let resource_hierarchy = optional_string(object, "resource_hierarchy")?;

    let replica_number = match object.get("replica_number").filter(|v| !v.is_null()) {
        Some(value) => Some(value.as_i64().and_then(|n| i32::try_from(n).ok()).ok_or_else(
            || {
                Error::InvalidInput(format!(
                    "Unexpected type in JSON input: ['replica_number' is {}]",
                    type_name(value)
                ))
            },
        )?),
        None => None,
    };

    let admin_mode = match object.get("admin_mode").filter(|v| !v.is_null()) {
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(Error::InvalidInput(format!(
                "Unexpected type in JSON input: ['admin_mode' is {}]",
                type_name(other)
            )))
        }
        None => false,
    };

    Ok(TruncateRequest {
        path,
        length,
        target_resource,
        replica_number,
        resource_hierarchy,
        admin_mode,
    })
}

fn optional_string(
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<String>> {
    match object.get(key).filter(|v| !v.is_null()) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::InvalidInput(format!(
            "Unexpected type in JSON input: ['{}' is {}]",
            key,
            type_name(other)
        ))),
        None => Ok(None),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Response body. The status code travels out-of-band in the
/// binary-structured variant and embedded as `error_code` in the JSON
/// variant.
#[derive(Debug, Clone, Serialize)]
pub struct WireResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
}

impl WireResponse {
    /// Message-only body; the code travels out-of-band.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: None,
        }
    }

    /// Body with the code embedded (string/JSON variant).
    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: Some(code),
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of a string/int struct cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_parses() {
        let request = parse_request(r#"{"path": "/tempZone/home/alice/data", "length": 8}"#).unwrap();
        assert_eq!(request.path, "/tempZone/home/alice/data");
        assert_eq!(request.length, 8);
        assert!(request.target_resource.is_none());
        assert!(!request.admin_mode);
    }

    #[test]
    fn test_full_request_parses() {
        let request = parse_request(
            r#"{"version": 1, "path": "/z/x", "length": 0, "target_resource": "r1", "admin_mode": true}"#,
        )
        .unwrap();
        assert_eq!(request.target_resource.as_deref(), Some("r1"));
        assert!(request.admin_mode);
    }

    #[test]
    fn test_empty_string_fails_to_parse() {
        let err = parse_request("").unwrap_err();
        assert!(err.to_string().contains("Failed to parse input to JSON."));
    }

    #[test]
    fn test_non_json_fails_to_parse() {
        let err = parse_request("this results in an error").unwrap_err();
        assert!(err.to_string().contains("Failed to parse input to JSON."));
    }

    #[test]
    fn test_json_array_is_not_an_object() {
        let err = parse_request(r#"["path", "length"]"#).unwrap_err();
        assert!(err
            .to_string()
            .contains("Expected input to be a JSON object."));
    }

    #[test]
    fn test_empty_object_is_missing_path() {
        let err = parse_request("{}").unwrap_err();
        assert!(err.to_string().contains("Input is missing 'path' key."));
    }

    #[test]
    fn test_null_members_count_as_missing() {
        let err = parse_request(r#"{"path": null, "length": null}"#).unwrap_err();
        assert!(err.to_string().contains("Input is missing 'path' key."));
    }

    #[test]
    fn test_missing_length() {
        let err = parse_request(r#"{"path": "/z/x"}"#).unwrap_err();
        assert!(err.to_string().contains("Input is missing 'length' key."));
    }

    #[test]
    fn test_wrong_member_types() {
        let err = parse_request(r#"{"path": 42, "length": 8}"#).unwrap_err();
        assert!(err.to_string().contains("Unexpected type in JSON input"));

        let err = parse_request(r#"{"path": "/z/x", "length": "eight"}"#).unwrap_err();
        assert!(err.to_string().contains("Unexpected type in JSON input"));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let err = parse_request(r#"{"version": 2, "path": "/z/x", "length": 8}"#).unwrap_err();
        assert!(err.to_string().contains("Unsupported wire version"));
    }

    #[test]
    fn test_response_code_embedding() {
        let body = WireResponse::new("ok").to_json();
        assert!(!body.contains("error_code"));

        let body = WireResponse::with_code(6, "locked").to_json();
        assert!(body.contains("\"error_code\":6"));
    }
}
