//! API Gateway proxy response envelope.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use textgen_lib::single_field_object;

/// Fixed header set attached to every response.
///
/// Serialized with the exact header names API Gateway forwards to browsers,
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,

    #[serde(rename = "Access-Control-Allow-Origin")]
    pub allow_origin: String,

    #[serde(rename = "Access-Control-Allow-Methods")]
    pub allow_methods: String,

    #[serde(rename = "Access-Control-Allow-Credentials")]
    pub allow_credentials: bool,

    #[serde(rename = "Access-Control-Allow-Headers")]
    pub allow_headers: String,
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        Self {
            content_type: "application/json".to_string(),
            allow_origin: "*".to_string(),
            allow_methods: "GET, POST, DELETE".to_string(),
            allow_credentials: true,
            allow_headers: "origin, x-requested-with".to_string(),
        }
    }
}

/// Wire-format response returned from the Lambda to API Gateway.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use textgen_lambda_shared::OutboundResponse;
///
/// let response = OutboundResponse::new(StatusCode::OK, "hello");
/// assert_eq!(response.status_code, 200);
/// assert_eq!(response.body, r#"{"message": "hello"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResponse {
    pub status_code: u16,
    pub headers: ResponseHeaders,
    /// JSON text `{"message": ...}`.
    pub body: String,
    pub is_base64_encoded: bool,
}

impl OutboundResponse {
    /// Build the envelope for a status code and a human-readable message.
    pub fn new(status: StatusCode, message: impl AsRef<str>) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: ResponseHeaders::default(),
            body: encode_message_body(message.as_ref()),
            is_base64_encoded: false,
        }
    }

    /// Build the envelope from a raw status code.
    ///
    /// Codes outside the valid HTTP range fall back to 500.
    pub fn from_status_code(status_code: u16, message: impl AsRef<str>) -> Self {
        let status =
            StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, message)
    }

    /// Decode the `message` field back out of the body.
    pub fn message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        value.get("message")?.as_str().map(str::to_string)
    }
}

fn encode_message_body(message: &str) -> String {
    single_field_object("message", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn serializes_bit_exact_envelope() {
        let response = OutboundResponse::new(StatusCode::OK, "hi");
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"statusCode":200,"headers":{"Content-Type":"application/json","#,
                r#""Access-Control-Allow-Origin":"*","#,
                r#""Access-Control-Allow-Methods":"GET, POST, DELETE","#,
                r#""Access-Control-Allow-Credentials":true,"#,
                r#""Access-Control-Allow-Headers":"origin, x-requested-with"},"#,
                r#""body":"{\"message\": \"hi\"}","isBase64Encoded":false}"#
            )
        );
    }

    #[test]
    fn headers_have_fixed_cors_values() {
        let response = OutboundResponse::new(StatusCode::BAD_REQUEST, "x");
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(
            value["headers"],
            json!({
                "Content-Type": "application/json",
                "Access-Control-Allow-Origin": "*",
                "Access-Control-Allow-Methods": "GET, POST, DELETE",
                "Access-Control-Allow-Credentials": true,
                "Access-Control-Allow-Headers": "origin, x-requested-with"
            })
        );
        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["isBase64Encoded"], false);
    }

    #[test]
    fn body_escapes_quotes_and_newlines() {
        let response = OutboundResponse::new(StatusCode::OK, "line \"one\"\nline two");
        assert_eq!(response.body, r#"{"message": "line \"one\"\nline two"}"#);
        assert_eq!(response.message().as_deref(), Some("line \"one\"\nline two"));
    }

    #[test]
    fn body_escapes_non_ascii_as_utf16() {
        let response = OutboundResponse::new(StatusCode::OK, "caf\u{e9} \u{1f600}\u{7f}");
        assert_eq!(
            response.body,
            r#"{"message": "caf\u00e9 \ud83d\ude00\u007f"}"#
        );

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], "caf\u{e9} \u{1f600}\u{7f}");
    }

    #[test]
    fn invalid_status_code_falls_back_to_500() {
        let response = OutboundResponse::from_status_code(42, "odd");
        assert_eq!(response.status_code, 500);
        assert_eq!(OutboundResponse::from_status_code(400, "x").status_code, 400);
    }
}
