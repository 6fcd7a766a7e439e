//! Normalized application error model.
//!
//! Every failure the session layer surfaces to the UI is an [`AppError`].
//! Raw failures (library errors, `anyhow` chains, arbitrary values) are
//! funnelled through [`normalize_error`] so the UI only ever renders one shape.

use std::any::Any;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::id::IdError;

/// Message used when the caught value carries no usable error information.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// What went wrong, independent of how bad it is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Session or credential failure (sign-in, expired token, profile load).
    Authentication,
    /// The user is known but not allowed to do this.
    Authorization,
    Validation,
    Network,
    NotFound,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "AUTHENTICATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Network => "NETWORK",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Server => "SERVER",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How bad it is. Orthogonal to [`ErrorKind`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Error,
    Critical,
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Severity::Info => f.write_str("INFO"),
            Severity::Warning => f.write_str("WARNING"),
            Severity::Error => f.write_str("ERROR"),
            Severity::Critical => f.write_str("CRITICAL"),
        }
    }
}

/// Shared, clonable error cause.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The normalized error shape: `{message, kind, severity, cause?}`.
///
/// Serializes for the UI with the cause rendered as its display string.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct AppError {
    pub message: String,
    pub kind: ErrorKind,
    pub severity: Severity,
    #[source]
    #[serde(serialize_with = "serialize_cause", skip_serializing_if = "Option::is_none")]
    pub cause: Option<Cause>,
}

fn serialize_cause<S: Serializer>(cause: &Option<Cause>, serializer: S) -> Result<S::Ok, S::Error> {
    match cause {
        Some(cause) => serializer.serialize_str(&cause.to_string()),
        None => serializer.serialize_none(),
    }
}

impl AppError {
    pub fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            severity: Severity::default(),
            cause: None,
        }
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Authentication)
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Authorization)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Validation)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Network)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::NotFound)
    }

    pub fn server(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Server)
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ERROR_MESSAGE, ErrorKind::Unknown)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Text to show the user.
    pub fn user_message(&self) -> &str {
        if self.message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE
        } else {
            &self.message
        }
    }

    /// Whether the UI should offer a retry affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication | ErrorKind::Network)
    }
}

// Causes compare by rendered message: two normalizations of the same failure
// are equal even if they hold distinct allocations.
impl PartialEq for AppError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.kind == other.kind
            && self.severity == other.severity
            && match (&self.cause, &other.cause) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.to_string() == b.to_string(),
                _ => false,
            }
    }
}

impl Eq for AppError {}

/// A caught value awaiting normalization.
///
/// An already-normalized error, any Rust error value, or something that is
/// not an error at all (a panic payload, a JSON body, a bare string). The
/// last kind carries no information the normalized shape could use.
#[derive(Debug)]
pub enum Caught {
    App(AppError),
    Error(Box<dyn std::error::Error + Send + Sync + 'static>),
    Value,
}

impl Caught {
    pub fn error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::from(Box::new(err) as Box<dyn std::error::Error + Send + Sync + 'static>)
    }

    /// Capture a value that is not an error.
    pub fn value<T: ?Sized>(_value: &T) -> Self {
        Self::Value
    }
}

impl From<AppError> for Caught {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync + 'static>> for Caught {
    fn from(value: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        match value.downcast::<AppError>() {
            Ok(app) => Self::App(*app),
            Err(other) => Self::Error(other),
        }
    }
}

impl From<anyhow::Error> for Caught {
    fn from(value: anyhow::Error) -> Self {
        match value.downcast::<AppError>() {
            Ok(app) => Self::App(app),
            Err(other) => Self::Error(other.into()),
        }
    }
}

macro_rules! impl_caught_from_error {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Caught {
                fn from(value: $t) -> Self {
                    Self::Error(Box::new(value))
                }
            }
        )*
    };
}

impl_caught_from_error!(std::io::Error, serde_json::Error, IdError, core::fmt::Error);

macro_rules! impl_caught_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Caught {
                fn from(_: $t) -> Self {
                    Self::Value
                }
            }
        )*
    };
}

impl_caught_from_value!(serde_json::Value, String, &str, ());

/// Panic payloads from `std::panic::catch_unwind`.
impl From<Box<dyn Any + Send + 'static>> for Caught {
    fn from(_: Box<dyn Any + Send + 'static>) -> Self {
        Self::Value
    }
}

/// Normalize any caught value into an [`AppError`].
///
/// - an `AppError` is returned unchanged;
/// - any other error becomes an `AUTHENTICATION`/`ERROR` app error carrying
///   the original as its cause;
/// - anything else becomes the generic `UNKNOWN`/`ERROR` app error.
///
/// Total and idempotent: `normalize_error(normalize_error(x)) == normalize_error(x)`.
pub fn normalize_error(value: impl Into<Caught>) -> AppError {
    match value.into() {
        Caught::App(err) => err,
        Caught::Error(err) => AppError {
            message: err.to_string(),
            kind: ErrorKind::Authentication,
            severity: Severity::Error,
            cause: Some(Arc::from(err)),
        },
        Caught::Value => AppError::unknown(),
    }
}
