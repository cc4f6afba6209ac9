//! Bed (giường) records

use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum BedStatus {
        Available => "available",
        Occupied => "occupied",
        Maintenance => "maintenance",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bed {
    pub id: i64,
    pub phong_id: i64,
    pub so_giuong: String,
    pub trang_thai: BedStatus,
    #[serde(default)]
    pub ma_sinh_vien: Option<String>,
}

impl Bed {
    /// A bed can take a student when it is marked available and nobody holds it
    pub fn is_available(&self) -> bool {
        self.trang_thai == BedStatus::Available && self.ma_sinh_vien.is_none()
    }
}
