//! Room (phòng) records

use super::student::Gender;
use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum RoomStatus {
        Available => "available",
        Full => "full",
        Maintenance => "maintenance",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub so_phong: String,
    #[serde(default)]
    pub loai_phong: Option<String>,
    /// Restricts the room to one gender when set
    #[serde(default)]
    pub gioi_tinh: Option<Gender>,
    pub suc_chua: u32,
    #[serde(default)]
    pub so_nguoi_hien_tai: u32,
    #[serde(default)]
    pub gia_phong: i64,
    pub trang_thai: RoomStatus,
}

impl Room {
    /// True when the room's occupant counter has reached its capacity
    pub fn is_full(&self) -> bool {
        self.so_nguoi_hien_tai >= self.suc_chua
    }

    pub fn free_slots(&self) -> u32 {
        self.suc_chua.saturating_sub(self.so_nguoi_hien_tai)
    }

    pub fn is_under_maintenance(&self) -> bool {
        self.trang_thai == RoomStatus::Maintenance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub so_phong: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loai_phong: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gioi_tinh: Option<Gender>,
    pub suc_chua: u32,
    pub gia_phong: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trang_thai: Option<RoomStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gioi_tinh: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loai_phong: Option<String>,
}
