//! Payment (thanh toán) records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Overdue => "overdue",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub ma_sinh_vien: String,
    pub so_tien: i64,
    pub loai_thanh_toan: String,
    #[serde(default)]
    pub ky_thanh_toan: Option<String>,
    pub trang_thai: PaymentStatus,
    #[serde(default)]
    pub ngay_thanh_toan: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn is_outstanding(&self) -> bool {
        matches!(self.trang_thai, PaymentStatus::Pending | PaymentStatus::Overdue)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub ma_sinh_vien: String,
    pub so_tien: i64,
    pub loai_thanh_toan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ky_thanh_toan: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma_sinh_vien: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trang_thai: Option<PaymentStatus>,
}

/// Sum of everything a student still owes
pub fn outstanding_total(payments: &[Payment]) -> i64 {
    payments.iter().filter(|p| p.is_outstanding()).map(|p| p.so_tien).sum()
}
