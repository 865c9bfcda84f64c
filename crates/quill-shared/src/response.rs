//! Problem documents (RFC 7807) returned for every failed request.

use serde::{Deserialize, Serialize};

/// A rejected request field and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// `application/problem+json` body.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Validation failures, one per field, in field order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            errors: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The detail when present, otherwise the title.
    pub fn message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.title)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    /// A 400 listing every rejected field.
    pub fn validation(detail: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::bad_request(detail)
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(500, "Internal Server Error").with_detail(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_problem_wire_shape() {
        let problem = ErrorResponse::not_found("Post with ID 1 not found");
        assert_eq!(
            serde_json::to_value(&problem).unwrap(),
            json!({
                "type": "about:blank",
                "title": "Not Found",
                "status": 404,
                "detail": "Post with ID 1 not found"
            })
        );
    }

    #[test]
    fn test_validation_problem_lists_fields() {
        let problem = ErrorResponse::validation(
            "Title is required",
            vec![FieldError {
                field: "title".to_string(),
                message: "Title is required".to_string(),
            }],
        );
        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value["status"], 400);
        assert_eq!(value["errors"][0]["field"], "title");
    }

    #[test]
    fn test_message_falls_back_to_title() {
        assert_eq!(ErrorResponse::new(502, "Bad Gateway").message(), "Bad Gateway");
    }
}
