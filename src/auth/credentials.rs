//! Credential value types.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use super::provider::{TokenFuture, TokenProvider};

/// A secret string that is wiped from memory on drop and never printed.
///
/// ```rust
/// use zoomsync::auth::Secret;
///
/// let secret = Secret::from("s3cr3t");
/// assert_eq!(secret.expose(), "s3cr3t");
/// assert_eq!(format!("{:?}", secret), "[REDACTED]");
/// ```
#[derive(Clone, Default)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Creates a new secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Returns the secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A pre-issued bearer token.
///
/// Useful for development and for tests where the token is obtained
/// out of band.
///
/// ## Example
///
/// ```rust
/// use zoomsync::auth::StaticToken;
///
/// let token = StaticToken::new("eyJhbGciOi...");
/// assert_eq!(token.token(), "eyJhbGciOi...");
/// ```
#[derive(Clone)]
pub struct StaticToken {
    token: Arc<str>,
}

impl StaticToken {
    /// Creates a new static token provider.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }

    /// Returns the token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl<S: Into<String>> From<S> for StaticToken {
    fn from(token: S) -> Self {
        Self::new(token)
    }
}

impl TokenProvider for StaticToken {
    fn get_token(&self) -> TokenFuture<'_> {
        let token = self.token.to_string();
        Box::pin(async move { Ok(token) })
    }
}
