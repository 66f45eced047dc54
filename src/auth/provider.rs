//! Token provider trait for bearer credential acquisition.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::Error;

/// A type alias for the boxed future returned by token providers.
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<String, Error>> + Send + 'a>>;

/// Trait for supplying the bearer token attached to upstream requests.
///
/// Acquisition and refresh of the token live behind this trait; the sync
/// core only ever asks for the current token.
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn TokenProvider>`.
///
/// ## Example: Environment Variable Provider
///
/// ```rust
/// use zoomsync::auth::{TokenFuture, TokenProvider};
///
/// struct EnvTokenProvider {
///     env_var: String,
/// }
///
/// impl TokenProvider for EnvTokenProvider {
///     fn get_token(&self) -> TokenFuture<'_> {
///         let env_var = self.env_var.clone();
///         Box::pin(async move {
///             std::env::var(&env_var).map_err(|_| {
///                 zoomsync::Error::configuration(format!("environment variable {} not set", env_var))
///             })
///         })
///     }
/// }
/// ```
pub trait TokenProvider: Send + Sync {
    /// Returns a future that resolves to a bearer token valid for
    /// immediate use.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be obtained; it is propagated
    /// to the caller of the upstream request.
    fn get_token(&self) -> TokenFuture<'_>;
}

impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    fn get_token(&self) -> TokenFuture<'_> {
        (**self).get_token()
    }
}

impl<T: TokenProvider + ?Sized> TokenProvider for Box<T> {
    fn get_token(&self) -> TokenFuture<'_> {
        (**self).get_token()
    }
}
