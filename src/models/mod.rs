//! Resource models exchanged with the dormitory API
//!
//! Field names follow the backend's camelCase Vietnamese keys
//! (`maSinhVien`, `trangThai`, ...). Status enums keep unknown wire values in
//! an `Other` variant so one unexpected status does not fail a whole list.

/// Declares a string-backed status enum with an `Other` fallback
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(value) => value.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Other(value),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(value) => value,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

pub mod bed;
pub mod payment;
pub mod room;
pub mod student;
pub mod transfer;
pub mod user;

pub use bed::{Bed, BedStatus};
pub use payment::{NewPayment, Payment, PaymentQuery, PaymentStatus};
pub use room::{NewRoom, Room, RoomQuery, RoomStatus};
pub use student::{Gender, NewStudent, Student, StudentQuery, StudentStatus};
pub use transfer::{NewTransferRequest, TransferQuery, TransferRequest, TransferStatus};
pub use user::{Role, User};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_survives_deserialization() {
        let status: BedStatus = serde_json::from_str(r#""reserved""#).unwrap();
        assert_eq!(status, BedStatus::Other("reserved".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""reserved""#);
    }

    #[test]
    fn test_known_status_round_trips_wire_value() {
        let status: TransferStatus = serde_json::from_str(r#""approved""#).unwrap();
        assert_eq!(status, TransferStatus::Approved);
        assert_eq!(status.to_string(), "approved");
    }

    #[test]
    fn test_status_wire_values() {
        let students = [StudentStatus::Pending, StudentStatus::Active, StudentStatus::Inactive];
        assert_eq!(students.iter().map(|s| s.as_str()).collect::<Vec<_>>(), ["pending", "active", "inactive"]);

        let rooms = [RoomStatus::Available, RoomStatus::Full, RoomStatus::Maintenance];
        assert_eq!(rooms.iter().map(|s| s.as_str()).collect::<Vec<_>>(), ["available", "full", "maintenance"]);

        let beds = [BedStatus::Available, BedStatus::Occupied, BedStatus::Maintenance];
        assert_eq!(beds.iter().map(|s| s.as_str()).collect::<Vec<_>>(), ["available", "occupied", "maintenance"]);

        let payments = [PaymentStatus::Pending, PaymentStatus::Paid, PaymentStatus::Overdue];
        assert_eq!(payments.iter().map(|s| s.as_str()).collect::<Vec<_>>(), ["pending", "paid", "overdue"]);

        let transfers = [TransferStatus::Pending, TransferStatus::Approved, TransferStatus::Rejected];
        assert_eq!(transfers.iter().map(|s| s.as_str()).collect::<Vec<_>>(), ["pending", "approved", "rejected"]);

        assert_eq!(Gender::Male.as_str(), "nam");
        assert_eq!(Gender::Female.as_str(), "nu");
        let roles = [Role::Admin, Role::Staff, Role::Student];
        assert_eq!(roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(), ["admin", "staff", "student"]);
    }
}
