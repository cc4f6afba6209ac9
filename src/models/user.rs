//! Authenticated user record

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Account role
    pub enum Role {
        Admin => "admin",
        Staff => "staff",
        Student => "student",
    }
}

/// User record returned by login and `/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_sinh_vien: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ho_ten: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.ho_ten.as_deref().unwrap_or(&self.username)
    }
}
