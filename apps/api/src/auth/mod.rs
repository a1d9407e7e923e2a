//! Auth integration: wraps an external identity provider.
//!
//! The provider owns accounts and tokens; this service only tracks whether a
//! visit has a session and hands the provider's errors back verbatim.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub mod credentials;
pub mod handlers;
pub mod identity_toolkit;
pub mod observer;
#[cfg(test)]
pub mod testing;

pub use credentials::{Credentials, FederatedAssertion};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Rejected locally; the provider was not contacted.
    #[error("{0}")]
    Validation(String),

    /// The provider rejected the call. Message is the provider's own.
    #[error("{0}")]
    Provider(String),

    #[error("{0}")]
    Transport(String),
}

/// Identity of a signed-in user. Provider tokens are not retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// `password` or the federated provider id, e.g. `google.com`.
    pub provider: String,
    pub signed_in_at: DateTime<Utc>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_account(&self, credentials: &Credentials) -> Result<AuthUser, AuthError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError>;

    async fn sign_in_with_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self, user: &AuthUser) -> Result<(), AuthError>;
}
