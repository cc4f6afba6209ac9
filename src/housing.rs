//! Bed/room availability derived from server data.
//!
//! The server owns occupancy; these helpers recompute it from the bed list so
//! an assignment screen can grey out full rooms and refuse obviously invalid
//! assignments before making a call.

use crate::models::{Bed, BedStatus, Room, Student};
use crate::types::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("Giường {bed} không thuộc phòng {room}")]
    BedNotInRoom { bed: String, room: String },

    #[error("Giường {0} không còn trống")]
    BedUnavailable(String),

    #[error("Phòng {0} đã đầy")]
    RoomFull(String),

    #[error("Phòng {0} đang bảo trì")]
    RoomUnderMaintenance(String),

    #[error("Phòng {room} không dành cho giới tính của sinh viên {student}")]
    GenderMismatch { room: String, student: String },

    #[error("Sinh viên {0} đã có giường")]
    StudentAlreadyHoused(String),
}

impl From<AssignmentError> for ApiError {
    fn from(error: AssignmentError) -> Self {
        ApiError::Conflict(error.to_string())
    }
}

/// Occupancy of one room recomputed from its beds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub capacity: u32,
    pub occupied: u32,
    pub available: u32,
    pub maintenance: u32,
}

impl RoomOccupancy {
    /// Counts beds belonging to `room`; beds of other rooms are ignored
    ///
    /// With no beds listed, falls back to the room's own counters.
    pub fn from_beds(room: &Room, beds: &[Bed]) -> Self {
        let mut occupied = 0;
        let mut available = 0;
        let mut maintenance = 0;
        let mut seen = 0;

        for bed in beds.iter().filter(|b| b.phong_id == room.id) {
            seen += 1;
            if bed.ma_sinh_vien.is_some() || bed.trang_thai == BedStatus::Occupied {
                occupied += 1;
            } else if bed.trang_thai == BedStatus::Maintenance {
                maintenance += 1;
            } else if bed.is_available() {
                available += 1;
            }
        }

        if seen == 0 {
            return Self {
                capacity: room.suc_chua,
                occupied: room.so_nguoi_hien_tai,
                available: room.free_slots(),
                maintenance: 0,
            };
        }

        Self {
            capacity: room.suc_chua,
            occupied,
            available: available.min(room.suc_chua.saturating_sub(occupied)),
            maintenance,
        }
    }

    pub fn is_full(&self) -> bool {
        self.occupied >= self.capacity || self.available == 0
    }

    /// Share of capacity in use, for an occupancy bar
    pub fn fill_ratio(&self) -> f32 {
        if self.capacity == 0 {
            return 1.0;
        }
        (self.occupied as f32 / self.capacity as f32).min(1.0)
    }
}

/// Checks whether `student` may take `bed` in `room`
pub fn check_assignment(room: &Room, bed: &Bed, student: &Student) -> Result<(), AssignmentError> {
    if bed.phong_id != room.id {
        return Err(AssignmentError::BedNotInRoom {
            bed: bed.so_giuong.clone(),
            room: room.so_phong.clone(),
        });
    }
    if student.giuong_id.is_some() {
        return Err(AssignmentError::StudentAlreadyHoused(student.ma_sinh_vien.clone()));
    }
    if room.is_under_maintenance() {
        return Err(AssignmentError::RoomUnderMaintenance(room.so_phong.clone()));
    }
    if !bed.is_available() {
        return Err(AssignmentError::BedUnavailable(bed.so_giuong.clone()));
    }
    if room.is_full() {
        return Err(AssignmentError::RoomFull(room.so_phong.clone()));
    }
    if let (Some(room_gender), Some(student_gender)) = (&room.gioi_tinh, &student.gioi_tinh) {
        if room_gender != student_gender {
            return Err(AssignmentError::GenderMismatch {
                room: room.so_phong.clone(),
                student: student.ma_sinh_vien.clone(),
            });
        }
    }
    Ok(())
}

/// Rooms that can still take `student`
pub fn rooms_for_student<'a>(rooms: &'a [Room], student: &Student) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|room| !room.is_full() && !room.is_under_maintenance())
        .filter(|room| match (&room.gioi_tinh, &student.gioi_tinh) {
            (Some(room_gender), Some(student_gender)) => room_gender == student_gender,
            _ => true,
        })
        .collect()
}
