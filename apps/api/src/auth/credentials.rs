use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::auth::AuthError;

/// Enforced locally before any provider call.
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("email pattern is valid")
    })
}

/// Email/password pair submitted by the login form.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Format and length checks only; strength and existence are the provider's call.
    pub fn validate(&self) -> Result<(), AuthError> {
        if !email_pattern().is_match(self.email.trim()) {
            return Err(AuthError::Validation("Please enter a valid email.".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            )));
        }
        Ok(())
    }
}

/// Credential obtained from a federated identity provider (e.g. a Google ID token).
#[derive(Clone, Deserialize)]
pub struct FederatedAssertion {
    pub id_token: String,
    /// Falls back to the configured provider when absent.
    #[serde(default)]
    pub provider_id: Option<String>,
}

impl fmt::Debug for FederatedAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederatedAssertion")
            .field("provider_id", &self.provider_id)
            .finish_non_exhaustive()
    }
}

impl FederatedAssertion {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.id_token.trim().is_empty() {
            return Err(AuthError::Validation(
                "A federated identity token is required.".to_string(),
            ));
        }
        Ok(())
    }
}
