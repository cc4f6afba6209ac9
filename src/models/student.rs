//! Student (sinh viên) records

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Residency status of a student
    pub enum StudentStatus {
        Pending => "pending",
        Active => "active",
        Inactive => "inactive",
    }
}

wire_enum! {
    pub enum Gender {
        Male => "nam",
        Female => "nu",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub ma_sinh_vien: String,
    pub ho_ten: String,
    #[serde(default)]
    pub gioi_tinh: Option<Gender>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub so_dien_thoai: Option<String>,
    #[serde(default)]
    pub lop: Option<String>,
    pub trang_thai: StudentStatus,
    /// Bed currently held, if any
    #[serde(default)]
    pub giuong_id: Option<i64>,
}

/// Self-registration / create payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub ma_sinh_vien: String,
    pub ho_ten: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gioi_tinh: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so_dien_thoai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Filters for listing students
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trang_thai: Option<StudentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
