//! `merchantdesk-core`: shared primitives for the merchant dashboard.
//!
//! Identifiers and the normalized error model. No I/O, no UI concerns.

pub mod error;
pub mod id;

pub use error::{
    AppError, Caught, Cause, ErrorKind, Severity, UNKNOWN_ERROR_MESSAGE,
    normalize_error,
};
pub use id::{IdError, MerchantId, UserId};
