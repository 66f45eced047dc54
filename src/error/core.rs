//! Main error type for the connector.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use super::ErrorKind;

/// The primary error type for connector operations.
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── status: Option           (upstream HTTP status, if any)
/// ├── body: Option             (raw upstream response body, if any)
/// ├── retry_after: Option      (rate limit delay hint)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use zoomsync::{Error, ErrorKind};
///
/// fn handle_error(err: Error) {
///     match err.kind() {
///         ErrorKind::UpstreamStatus => {
///             eprintln!("upstream said {:?}: {:?}", err.status(), err.body());
///         }
///         ErrorKind::MalformedCursor => {
///             eprintln!("refusing to restart sync: {}", err);
///         }
///         kind if kind.is_retriable() => {
///             eprintln!("transient failure, the orchestrator may retry");
///         }
///         _ => eprintln!("permanent error: {}", err),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    status: Option<u16>,
    body: Option<String>,
    retry_after: Option<Duration>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zoomsync::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Configuration, "client id is missing");
    /// assert_eq!(err.kind(), ErrorKind::Configuration);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            retry_after: None,
            source: None,
        }
    }

    /// Creates an error for an upstream response with status >= 400.
    pub fn upstream_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            kind: ErrorKind::UpstreamStatus,
            message: format!("request failed with status code {}: {}", status, body).into(),
            status: Some(status),
            body: Some(body),
            retry_after: None,
            source: None,
        }
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the upstream HTTP status code, if this error came from one.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the raw upstream response body, if this error came from one.
    #[inline]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the recommended retry delay, if the upstream supplied one.
    #[inline]
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// Returns `true` if this error is generally safe to retry.
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }

    /// Returns `true` if the upstream reported the target as not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::UpstreamStatus && self.status == Some(404)
    }

    /// Sets the retry-after duration for this error.
    #[must_use]
    pub fn with_retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates a transport error.
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a malformed cursor error.
    pub fn malformed_cursor(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::MalformedCursor, message)
    }

    /// Creates a principal type error.
    pub fn principal_type(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::PrincipalType, message)
    }

    /// Creates a missing profile field error.
    pub fn missing_profile_field(field: &str) -> Self {
        Self::new(ErrorKind::MissingProfileField, format!("{} is required", field))
    }

    /// Creates an invalid entitlement error.
    pub fn invalid_entitlement(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidEntitlement, message)
    }

    /// Creates a deletion-not-confirmed error.
    pub fn deletion_not_confirmed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::DeletionNotConfirmed, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_response(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::malformed_cursor(format!("cursor is not valid base64: {}", err)).with_source(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::timeout(format!("request timed out: {}", err)).with_source(err)
        } else {
            Error::transport(format!("request failed: {}", err)).with_source(err)
        }
    }
}
