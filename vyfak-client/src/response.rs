//! Provider responses
//!
//! The API usually answers with a JSON object, but error pages and some
//! endpoints return plain text. Callers get whichever shape arrived.

use serde_json::Value;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    /// JSON object or array
    Json(Value),
    /// Anything that did not decode to a JSON object or array
    Raw(String),
}

impl ApiReply {
    /// Decode a response body
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => ApiReply::Json(value),
            _ => ApiReply::Raw(body.to_string()),
        }
    }

    /// Top-level field of a JSON object reply
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            ApiReply::Json(value) => value.get(key).filter(|v| !v.is_null()),
            ApiReply::Raw(_) => None,
        }
    }

    /// Field rendered as text; numbers are accepted for identifiers
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Provider-assigned identifier
    pub fn id(&self) -> Option<String> {
        self.get_text("id").filter(|id| !id.is_empty())
    }

    /// Human-facing invoice number
    pub fn number(&self) -> Option<String> {
        self.get_text("number")
    }

    /// `success == true`
    pub fn is_success_flag(&self) -> bool {
        matches!(self.get("success"), Some(Value::Bool(true)))
    }

    /// `status == "ok"`
    pub fn is_status_ok(&self) -> bool {
        matches!(self.get("status"), Some(Value::String(s)) if s == "ok")
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiReply::Json(value) => Some(value),
            ApiReply::Raw(_) => None,
        }
    }
}

impl std::fmt::Display for ApiReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiReply::Json(value) => write!(f, "{}", value),
            ApiReply::Raw(body) => f.write_str(body),
        }
    }
}

/// Status code and body of the most recent request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInfo {
    pub http_code: u16,
    pub data_sent: Option<Value>,
}

impl RequestInfo {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_code)
    }
}

/// Reply together with the request it answers
///
/// Read the status from here rather than from `last_info` when the client is
/// shared between tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub info: RequestInfo,
    pub reply: ApiReply,
}

impl ApiResponse {
    pub fn http_code(&self) -> u16 {
        self.info.http_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_body_is_structured() {
        let reply = ApiReply::from_body(r#"{"id": 9921, "number": "2024-0042"}"#);
        assert_eq!(reply.id().as_deref(), Some("9921"));
        assert_eq!(reply.number().as_deref(), Some("2024-0042"));
    }

    #[test]
    fn test_scalar_and_text_bodies_stay_raw() {
        assert_eq!(ApiReply::from_body("42"), ApiReply::Raw("42".into()));
        assert_eq!(
            ApiReply::from_body("<html>Bad Gateway</html>"),
            ApiReply::Raw("<html>Bad Gateway</html>".into())
        );
        assert_eq!(ApiReply::from_body(""), ApiReply::Raw(String::new()));
        assert!(ApiReply::from_body("oops").id().is_none());
    }

    #[test]
    fn test_success_markers() {
        assert!(ApiReply::Json(json!({"success": true})).is_success_flag());
        assert!(!ApiReply::Json(json!({"success": "true"})).is_success_flag());
        assert!(ApiReply::Json(json!({"status": "ok"})).is_status_ok());
        assert!(!ApiReply::Json(json!({"status": "OK"})).is_status_ok());
    }

    #[test]
    fn test_null_id_is_missing() {
        let reply = ApiReply::Json(json!({"id": null, "error": "bad vs"}));
        assert!(reply.id().is_none());
    }
}
