//! Authentication module
//!
//! This module provides the client side of authentication:
//! - Request/response DTOs for `/auth/*`
//! - Password policy evaluation and the change-password workflow
//! - The session capability (token + user) shared by all API calls

pub mod dto;
pub mod password;
pub mod session;

pub use dto::*;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
