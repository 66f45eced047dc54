//! Error kind enumeration for categorizing connector errors.

/// Categorization of connector errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// different handling strategies for different failure modes.
///
/// ## Retriable vs Non-Retriable
///
/// | ErrorKind              | Retriable | Raised                                   |
/// |------------------------|-----------|------------------------------------------|
/// | `Transport`            | Yes       | Network failure before a status arrived  |
/// | `Timeout`              | Yes       | Upstream call exceeded its deadline      |
/// | `UpstreamStatus`       | No        | Upstream answered with status >= 400     |
/// | `MalformedCursor`      | No        | Pagination token cannot be parsed        |
/// | `PrincipalType`        | No        | Grant/revoke principal is not a user     |
/// | `MissingProfileField`  | No        | Account profile lacks a required field   |
/// | `InvalidEntitlement`   | No        | Entitlement not supported by the target  |
/// | `DeletionNotConfirmed` | No        | Deleted user is still reachable          |
/// | `InvalidResponse`      | No        | Upstream body could not be decoded       |
/// | `Configuration`        | No        | Bad or missing settings                  |
/// | `Unauthorized`         | No        | Credentials rejected or insufficient     |
///
/// Validation kinds (`PrincipalType`, `MissingProfileField`,
/// `InvalidEntitlement`) are always raised before any upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Network or HTTP-level failure (DNS, connect, TLS, broken body).
    ///
    /// **Retriable.** Retry policy belongs to the transport, not the sync core.
    #[error("transport error")]
    Transport,

    /// The upstream call did not complete before its deadline.
    ///
    /// **Retriable.**
    #[error("timeout")]
    Timeout,

    /// The upstream API answered with an HTTP status >= 400.
    ///
    /// The error carries the status code and the raw response body.
    #[error("upstream status error")]
    UpstreamStatus,

    /// The opaque pagination token could not be decoded.
    ///
    /// Never recovered by resetting the cursor, since that would restart
    /// the sync and re-emit already delivered resources.
    #[error("malformed cursor")]
    MalformedCursor,

    /// A grant or revoke named a principal that is not a user.
    #[error("principal type error")]
    PrincipalType,

    /// An account-creation profile is missing a required field.
    #[error("missing profile field")]
    MissingProfileField,

    /// The entitlement is not one the target resource type offers.
    #[error("invalid entitlement")]
    InvalidEntitlement,

    /// A deleted principal could still be fetched afterwards.
    #[error("deletion not confirmed")]
    DeletionNotConfirmed,

    /// The upstream body could not be decoded.
    #[error("invalid response")]
    InvalidResponse,

    /// Configuration error (missing credentials, invalid URL).
    #[error("configuration error")]
    Configuration,

    /// Credentials were rejected, or the account lacks admin scopes.
    #[error("unauthorized")]
    Unauthorized,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zoomsync::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_retriable());
    /// assert!(!ErrorKind::MalformedCursor.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::Timeout)
    }

    /// Returns `true` for kinds raised by input validation, before any
    /// upstream call was made.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::PrincipalType
                | ErrorKind::MissingProfileField
                | ErrorKind::InvalidEntitlement
        )
    }
}
