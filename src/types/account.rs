//! Account provisioning records.

use serde::{Deserialize, Serialize};

use super::{Annotations, Resource};
use crate::Error;

/// Profile submitted when provisioning a new user account.
///
/// Fields are optional so that a missing value can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// Email address (also the login).
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
}

/// An [`AccountProfile`] with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAccount {
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Display name.
    pub display_name: String,
}

impl AccountProfile {
    /// Checks required fields in order: email, first name, last name,
    /// display name.
    ///
    /// # Errors
    ///
    /// Returns `MissingProfileField` naming the first absent or empty field.
    pub fn validate(&self) -> Result<ValidatedAccount, Error> {
        fn required(value: &Option<String>, field: &str) -> Result<String, Error> {
            match value.as_deref() {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(Error::missing_profile_field(field)),
            }
        }

        Ok(ValidatedAccount {
            email: required(&self.email, "email")?,
            first_name: required(&self.first_name, "first_name")?,
            last_name: required(&self.last_name, "last_name")?,
            display_name: required(&self.display_name, "display_name")?,
        })
    }
}

/// Credential handling offered when provisioning accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialOption {
    /// The account is created without a password; the user activates it
    /// through the upstream invitation flow.
    NoPassword,
}

/// Result of a successful account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountResult {
    /// The newly created user resource.
    pub resource: Resource,
    /// Rate-limit state of the create call.
    pub annotations: Annotations,
}
