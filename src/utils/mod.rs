pub mod error_handler;

pub use error_handler::{normalize, normalize_error, ErrorShape, NormalizedError};
