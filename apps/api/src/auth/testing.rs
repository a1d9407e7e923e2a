//! In-memory identity provider for tests. Applies the same local checks as the real client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::auth::{AuthError, AuthUser, Credentials, FederatedAssertion, IdentityProvider};

#[derive(Default)]
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn with_account(email: &str, password: &str) -> Self {
        let provider = Self::default();
        provider
            .accounts
            .lock()
            .insert(email.to_string(), password.to_string());
        provider
    }

    /// Calls that got past local validation.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn user(uid: String, email: Option<String>, provider: &str) -> AuthUser {
        AuthUser {
            uid,
            email,
            display_name: None,
            provider: provider.to_string(),
            signed_in_at: Utc::now(),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_account(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        credentials.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock();
        if accounts.contains_key(&credentials.email) {
            return Err(AuthError::Provider("EMAIL_EXISTS".into()));
        }
        accounts.insert(credentials.email.clone(), credentials.password.clone());
        Ok(Self::user(
            format!("uid-{}", accounts.len()),
            Some(credentials.email.clone()),
            "password",
        ))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        credentials.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.accounts.lock().get(&credentials.email) {
            Some(password) if *password == credentials.password => Ok(Self::user(
                format!("uid-{}", credentials.email),
                Some(credentials.email.clone()),
                "password",
            )),
            _ => Err(AuthError::Provider("INVALID_LOGIN_CREDENTIALS".into())),
        }
    }

    async fn sign_in_with_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<AuthUser, AuthError> {
        assertion.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let provider = assertion.provider_id.as_deref().unwrap_or("google.com");
        Ok(Self::user("uid-federated".into(), None, provider))
    }

    async fn sign_out(&self, _user: &AuthUser) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
