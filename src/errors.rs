//! Centralized error handling.
//!
//! Every failure the application surfaces is an [`AppError`]: a kind drawn
//! from the closed [`ErrorKind`] set, a human-readable message and an
//! optional cause. Callers branch on the kind, never on message text, and
//! the cause chain stays reachable through [`std::error::Error::source`].

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Owned, thread-safe cause carried by an [`AppError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Discriminant of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    Unauthorized,
    Forbidden,
    InvalidInput,
    Internal,
    AlreadyExists,
    NotImplemented,
    Timeout,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::Conflict,
        ErrorKind::NotFound,
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
        ErrorKind::InvalidInput,
        ErrorKind::Internal,
        ErrorKind::AlreadyExists,
        ErrorKind::NotImplemented,
        ErrorKind::Timeout,
    ];

    /// Stable error code for clients
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::NotImplemented => "NOT_IMPLEMENTED",
            ErrorKind::Timeout => "TIMEOUT",
        }
    }

    /// Message used by the kind-only sentinel value
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Conflict => "item already exists",
            ErrorKind::NotFound => "resource does not exist",
            ErrorKind::Unauthorized => "authentication required",
            ErrorKind::Forbidden => "insufficient permissions",
            ErrorKind::InvalidInput => "check provided data",
            ErrorKind::Internal => "something went wrong",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::NotImplemented => "not implemented",
            ErrorKind::Timeout => "operation timed out",
        }
    }

    /// HTTP status code for this kind
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Conflict | ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the message may be shown to clients as-is
    fn is_client_safe(self) -> bool {
        !matches!(self, ErrorKind::Internal | ErrorKind::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Application error: a kind, a message and an optional wrapped cause.
///
/// Two errors are "the same kind" when their kinds match, regardless of
/// message or cause. Use [`AppError::is`], [`AppError::same_kind`] or the
/// `is_*` predicates for that comparison; `AppError` deliberately does not
/// implement `PartialEq`.
#[derive(Error, Debug)]
#[error("{kind}: {message}{}", render_cause(.message, .source))]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxError>,
}

// A cause whose text is already the message is not repeated.
fn render_cause(message: &str, source: &Option<BoxError>) -> String {
    match source {
        Some(cause) => {
            let cause = cause.to_string();
            if cause == message {
                String::new()
            } else {
                format!(" ({})", cause)
            }
        }
        None => String::new(),
    }
}

impl AppError {
    /// Create an error of any kind, optionally wrapping a cause.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<Cow<'static, str>>,
        cause: Option<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: cause,
        }
    }

    /// Kind-only value with the default message and no cause.
    pub fn sentinel(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message(), None)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wrapped cause, if any
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// True if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// True if both errors share a kind; messages and causes are ignored.
    pub fn same_kind(&self, other: &AppError) -> bool {
        self.kind == other.kind
    }

    /// Find the first error of type `T` in the cause chain.
    pub fn find_cause<T: StdError + 'static>(&self) -> Option<&T> {
        let mut current = StdError::source(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<T>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        if self.kind.is_client_safe() {
            return self.message.to_string();
        }

        tracing::error!(kind = %self.kind, "{}", self);
        match self.kind {
            ErrorKind::Timeout => "The operation timed out".to_string(),
            _ => "An internal error occurred".to_string(),
        }
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        AppError::sentinel(kind)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::internal_with(err, "database error")
    }
}

/// Report whether `err` carries `kind`.
///
/// Walks the cause chain and compares against the first [`AppError`] found,
/// so a plain sentinel and a wrapped, message-bearing error of the same kind
/// both match.
pub fn is_kind(err: &(dyn StdError + 'static), kind: ErrorKind) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(app) = e.downcast_ref::<AppError>() {
            return app.kind == kind;
        }
        current = e.source();
    }
    false
}

macro_rules! kind_helpers {
    ($($kind:ident => $plain:ident, $with:ident, $is:ident;)*) => {
        /// Convenience constructors
        impl AppError {
            $(
                #[doc = concat!("`", stringify!($kind), "` error with a message and no cause.")]
                pub fn $plain(message: impl Into<Cow<'static, str>>) -> Self {
                    Self::new(ErrorKind::$kind, message, None)
                }

                #[doc = concat!("`", stringify!($kind), "` error wrapping `cause`.")]
                pub fn $with<E>(cause: E, message: impl Into<Cow<'static, str>>) -> Self
                where
                    E: Into<BoxError>,
                {
                    Self::new(ErrorKind::$kind, message, Some(cause.into()))
                }
            )*
        }

        $(
            #[doc = concat!("True if `err` carries the `", stringify!($kind), "` kind.")]
            pub fn $is(err: &(dyn StdError + 'static)) -> bool {
                is_kind(err, ErrorKind::$kind)
            }
        )*
    };
}

kind_helpers! {
    Conflict => conflict, conflict_with, is_conflict;
    NotFound => not_found, not_found_with, is_not_found;
    Unauthorized => unauthorized, unauthorized_with, is_unauthorized;
    Forbidden => forbidden, forbidden_with, is_forbidden;
    InvalidInput => invalid_input, invalid_input_with, is_invalid_input;
    Internal => internal, internal_with, is_internal;
    AlreadyExists => already_exists, already_exists_with, is_already_exists;
    NotImplemented => not_implemented, not_implemented_with, is_not_implemented;
    Timeout => timeout, timeout_with, is_timeout;
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.kind.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
