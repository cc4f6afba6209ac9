//! KTX Portal client
//!
//! Client library for the dormitory (ký túc xá) management REST API: student
//! self-registration, room and bed assignment, payments, room-transfer
//! requests and password management.
//!
//! The password-change flow is built from three pieces:
//! [`auth::password::validator`] scores candidate passwords,
//! [`utils::error_handler`] turns any failure into field errors or a single
//! message, and [`auth::password::workflow`] drives the form through its
//! edit/confirm/submit states.

pub mod auth;
pub mod client;
pub mod config;
pub mod housing;
pub mod models;
pub mod types;
pub mod utils;

pub use auth::session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use client::{ApiClient, AuthApi, BedApi, PaymentApi, RoomApi, StudentApi, TransferApi};
pub use types::{ApiError, AppConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CLIENT_NAME: &str = "ktx-portal";
