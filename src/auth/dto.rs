//! Data Transfer Objects (DTOs) for the authentication endpoints
//!
//! Request and response bodies for `/auth/*`

use crate::models::{Gender, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login request DTO
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Login response DTO
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Student self-registration DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub ma_sinh_vien: String,
    pub ho_ten: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gioi_tinh: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so_dien_thoai: Option<String>,
    pub username: String,
    pub password: String,
}

/// Change password request DTO
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangePasswordRequest { .. }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_wire_names() {
        let body = serde_json::to_value(ChangePasswordRequest {
            current_password: "Old123".to_string(),
            new_password: "New123".to_string(),
            confirm_password: "New123".to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "currentPassword": "Old123",
                "newPassword": "New123",
                "confirmPassword": "New123"
            })
        );
    }

    #[test]
    fn test_debug_hides_passwords() {
        let request = LoginRequest {
            username: "sv001".to_string(),
            password: "Secret123".to_string(),
        };
        assert!(!format!("{:?}", request).contains("Secret123"));
    }
}
