//! Response types shared by the handlers

pub mod error;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
