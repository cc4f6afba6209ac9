//! Room-transfer requests (yêu cầu chuyển phòng)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum TransferStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub id: i64,
    pub ma_sinh_vien: String,
    #[serde(default)]
    pub phong_hien_tai: Option<i64>,
    pub phong_muon: i64,
    pub ly_do: String,
    pub trang_thai: TransferStatus,
    #[serde(default)]
    pub ly_do_tu_choi: Option<String>,
    #[serde(default)]
    pub ngay_tao: Option<DateTime<Utc>>,
}

impl TransferRequest {
    /// Only pending requests can still be approved, rejected or cancelled
    pub fn is_open(&self) -> bool {
        self.trang_thai == TransferStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransferRequest {
    pub phong_muon: i64,
    pub ly_do: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trang_thai: Option<TransferStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma_sinh_vien: Option<String>,
}
