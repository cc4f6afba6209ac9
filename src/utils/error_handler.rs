//! API Error Normalizer
//!
//! Converts every failure a form can see into one uniform shape: either a map
//! of per-field messages, or a single general message for a notification.
//!
//! `ApiError` is first classified into the closed [`ErrorShape`] set, then
//! [`normalize`] turns the shape into a [`NormalizedError`]. Both steps are
//! total; no input makes them panic.

use crate::types::{ApiError, FieldError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Shown when no usable message can be extracted from a failure
pub const GENERIC_ERROR_MESSAGE: &str = "Đã xảy ra lỗi. Vui lòng thử lại.";

/// Shown when the server could not be reached at all
pub const NETWORK_ERROR_MESSAGE: &str =
    "Không thể kết nối đến máy chủ. Vui lòng kiểm tra kết nối mạng.";

/// Field that receives the "new password equals old password" rejection
pub const NEW_PASSWORD_FIELD: &str = "newPassword";

static DUPLICATE_PASSWORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(trùng với mật khẩu (cũ|hiện tại)|giống (với )?mật khẩu (cũ|hiện tại)|phải khác (với )?mật khẩu (cũ|hiện tại)|(must not|cannot|can't) (match|be the same as) (the )?(old|current|previous) password|same as (the )?(old|current|previous) password|(must|should) be different from (the )?(old|current|previous) password)",
    )
    .expect("duplicate password pattern is a valid regex")
});

/// Closed set of failure shapes a form has to handle
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorShape {
    /// Structured field-level validation entries
    ValidationErrors(Vec<FieldError>),
    /// A single message, possibly supplied by the server
    Message {
        server: Option<String>,
        fallback: Option<String>,
    },
    /// No response was received
    NetworkFailure,
}

impl From<&ApiError> for ErrorShape {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Validation {
                errors,
                ..
            } if !errors.is_empty() => ErrorShape::ValidationErrors(errors.clone()),
            ApiError::Network(_) => ErrorShape::NetworkFailure,
            ApiError::Decode(_) => ErrorShape::Message {
                server: None,
                fallback: None,
            },
            other => ErrorShape::Message {
                server: other.server_message().map(str::to_string),
                fallback: Some(other.to_string()),
            },
        }
    }
}

/// Uniform error contract consumed by forms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedError {
    pub field_errors: BTreeMap<String, String>,
    pub general_message: Option<String>,
}

impl NormalizedError {
    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    fn general(message: String) -> Self {
        Self {
            field_errors: BTreeMap::new(),
            general_message: Some(message),
        }
    }

    fn fields(field_errors: BTreeMap<String, String>) -> Self {
        Self {
            field_errors,
            general_message: None,
        }
    }
}

/// True when the message says the new password repeats the old one
pub fn is_duplicate_password_message(message: &str) -> bool {
    DUPLICATE_PASSWORD_PATTERN.is_match(message)
}

/// Normalizes a classified failure
pub fn normalize(shape: ErrorShape) -> NormalizedError {
    match shape {
        ErrorShape::ValidationErrors(entries) => {
            let field_errors: BTreeMap<String, String> =
                entries.into_iter().map(|entry| (entry.field, entry.message)).collect();
            if field_errors.is_empty() {
                NormalizedError::general(GENERIC_ERROR_MESSAGE.to_string())
            } else {
                NormalizedError::fields(field_errors)
            }
        },
        ErrorShape::Message {
            server,
            fallback,
        } => {
            let message = [server, fallback]
                .into_iter()
                .flatten()
                .find(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

            if is_duplicate_password_message(&message) {
                let mut field_errors = BTreeMap::new();
                field_errors.insert(NEW_PASSWORD_FIELD.to_string(), message);
                NormalizedError::fields(field_errors)
            } else {
                NormalizedError::general(message)
            }
        },
        ErrorShape::NetworkFailure => NormalizedError::general(NETWORK_ERROR_MESSAGE.to_string()),
    }
}

/// Classifies and normalizes an API error in one step
pub fn normalize_error(error: &ApiError) -> NormalizedError {
    let normalized = normalize(ErrorShape::from(error));
    log::debug!(
        "normalized {:?} error into {} field error(s)",
        error.status(),
        normalized.field_errors.len()
    );
    normalized
}
