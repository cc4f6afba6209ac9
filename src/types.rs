//! Type definitions for ktx_portal
//!
//! Contains the shared error taxonomy, the backend response envelope and the
//! configuration model used throughout the client.

use crate::auth::password::validator::LetterRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One field-level validation entry as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Runtime API errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
    },

    #[error("{message}")]
    Server {
        status: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Session(String),
}

impl ApiError {
    /// Builds the error matching an HTTP status and the envelope's message/errors
    ///
    /// A non-empty field list wins over the status, except for 401 which
    /// always ends the session.
    pub fn new(status: u16, message: String, errors: Vec<FieldError>) -> Self {
        match status {
            401 => ApiError::Unauthenticated(message),
            _ if !errors.is_empty() => ApiError::Validation {
                status,
                message,
                errors,
            },
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            400..=499 => ApiError::Rejected {
                status,
                message,
            },
            _ => ApiError::Server {
                status,
                message,
            },
        }
    }

    /// True when the caller should drop the session and go back to login
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated(_))
    }

    /// HTTP status the error came from, if it came from a response at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Validation {
                status,
                ..
            }
            | ApiError::Rejected {
                status,
                ..
            }
            | ApiError::Server {
                status,
                ..
            } => Some(*status),
            ApiError::Network(_)
            | ApiError::Decode(_)
            | ApiError::Config(_)
            | ApiError::Session(_) => None,
        }
    }

    /// Message supplied by the server, when there is one
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ApiError::Validation {
                message,
                ..
            }
            | ApiError::Rejected {
                message,
                ..
            }
            | ApiError::Server {
                message,
                ..
            } => message,
            ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
            ApiError::Network(_)
            | ApiError::Decode(_)
            | ApiError::Config(_)
            | ApiError::Session(_) => return None,
        };
        Some(message.as_str()).filter(|m| !m.trim().is_empty())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

/// Standard response envelope: `{ success, data?, message?, errors? }`
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiEnvelope<serde_json::Value> {
    /// Reads each envelope key on its own
    ///
    /// A key with an unexpected shape is dropped without taking the others
    /// with it. `errors` entries that are not `{ field, message }` are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let errors = value.get("errors").and_then(serde_json::Value::as_array).map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value::<FieldError>(entry.clone()).ok())
                .collect()
        });

        Self {
            success: value.get("success").and_then(serde_json::Value::as_bool),
            data: value.get("data").filter(|data| !data.is_null()).cloned(),
            message: value.get("message").and_then(serde_json::Value::as_str).map(str::to_string),
            errors,
        }
    }
}

/// Paginated list payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
    pub letter_rule: LetterRule,
    pub min_password_length: usize,
    pub require_confirmation: bool,
    pub log_level: String,
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            request_timeout_secs: 30,
            session_file: PathBuf::from(".ktx-session.json"),
            letter_rule: LetterRule::UpperAndLower,
            min_password_length: 6,
            require_confirmation: true,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_maps_statuses() {
        assert!(ApiError::new(401, "expired".into(), vec![]).is_unauthenticated());
        assert_eq!(
            ApiError::new(403, "nope".into(), vec![]),
            ApiError::Forbidden("nope".into())
        );
        assert_eq!(
            ApiError::new(400, "bad".into(), vec![]),
            ApiError::Rejected {
                status: 400,
                message: "bad".into()
            }
        );
        assert_eq!(ApiError::new(503, "down".into(), vec![]).status(), Some(503));
    }

    #[test]
    fn test_new_with_field_errors_is_validation() {
        let error = ApiError::new(
            400,
            "Dữ liệu không hợp lệ".into(),
            vec![FieldError::new("newPassword", "too short")],
        );
        assert!(matches!(error, ApiError::Validation { ref errors, .. } if errors.len() == 1));
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn test_field_errors_kept_for_any_status() {
        let errors = vec![FieldError::new("email", "Email đã tồn tại")];
        let conflict = ApiError::new(409, "Dữ liệu bị trùng".into(), errors.clone());
        assert_eq!(
            conflict,
            ApiError::Validation {
                status: 409,
                message: "Dữ liệu bị trùng".into(),
                errors: errors.clone(),
            }
        );
        assert_eq!(conflict.status(), Some(409));
        assert_eq!(ApiError::new(500, "lỗi".into(), errors.clone()).status(), Some(500));

        // 401 still ends the session even when fields are attached
        assert!(ApiError::new(401, "expired".into(), errors).is_unauthenticated());
    }

    #[test]
    fn test_server_message_skips_blank() {
        assert_eq!(ApiError::Conflict("  ".into()).server_message(), None);
        assert_eq!(ApiError::NotFound("gone".into()).server_message(), Some("gone"));
        assert_eq!(ApiError::Network("refused".into()).server_message(), None);
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"message":"ok"}"#).unwrap();
        assert_eq!(envelope.success, Some(true));
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_envelope_from_json_tolerates_odd_keys() {
        let value = serde_json::json!({
            "success": false,
            "message": "Mật khẩu mới không được trùng với mật khẩu cũ",
            "errors": {"newPassword": "duplicate"}
        });
        let envelope = ApiEnvelope::from_json(&value);
        assert_eq!(envelope.success, Some(false));
        assert_eq!(envelope.message.as_deref(), Some("Mật khẩu mới không được trùng với mật khẩu cũ"));
        assert_eq!(envelope.errors, None);

        let value = serde_json::json!({
            "message": 42,
            "errors": [{"field": "email", "message": "Email đã tồn tại"}, "stray", {"field": "lop"}]
        });
        let envelope = ApiEnvelope::from_json(&value);
        assert_eq!(envelope.message, None);
        assert_eq!(envelope.errors, Some(vec![FieldError::new("email", "Email đã tồn tại")]));
    }
}
