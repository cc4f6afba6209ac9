//! REST client wrappers, one per backend resource
//!
//! Every wrapper shares [`ApiClient`] and the same contract: one HTTP call per
//! method, payload unwrapped on success, [`crate::types::ApiError`] on failure.

pub mod auth;
pub mod beds;
pub mod http;
pub mod payments;
pub mod rooms;
pub mod students;
pub mod transfers;

pub use auth::AuthApi;
pub use beds::BedApi;
pub use http::{Ack, ApiClient};
pub use payments::PaymentApi;
pub use rooms::RoomApi;
pub use students::StudentApi;
pub use transfers::TransferApi;
