//! Identity Toolkit REST client (the backend behind Firebase Auth).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};
use url::form_urlencoded;

use crate::auth::{AuthError, AuthUser, Credentials, FederatedAssertion, IdentityProvider};
use crate::config::IdentityConfig;

const PASSWORD_PROVIDER: &str = "password";
/// Required by signInWithIdp; the token is posted directly so any valid URI works.
const IDP_REQUEST_URI: &str = "http://localhost";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct IdentityToolkitClient {
    client: Client,
    config: IdentityConfig,
}

impl IdentityToolkitClient {
    pub fn new(config: IdentityConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}?key={}",
            self.config.api_url.trim_end_matches('/'),
            self.config.api_key
        )
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Identity provider returned {status} for {method}");
            return Err(AuthError::Provider(provider_error_message(body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn create_account(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        credentials.validate()?;
        let body = PasswordRequest {
            email: credentials.email.trim(),
            password: &credentials.password,
            return_secure_token: true,
        };
        let token: TokenResponse = self.post("signUp", &body).await?;
        info!("Created account {}", token.local_id);
        Ok(into_user(token, PASSWORD_PROVIDER))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        credentials.validate()?;
        let body = PasswordRequest {
            email: credentials.email.trim(),
            password: &credentials.password,
            return_secure_token: true,
        };
        let token: TokenResponse = self.post("signInWithPassword", &body).await?;
        Ok(into_user(token, PASSWORD_PROVIDER))
    }

    async fn sign_in_with_federated(
        &self,
        assertion: &FederatedAssertion,
    ) -> Result<AuthUser, AuthError> {
        assertion.validate()?;
        let provider_id = assertion
            .provider_id
            .as_deref()
            .unwrap_or(&self.config.federated_provider_id);
        let body = IdpRequest {
            post_body: idp_post_body(&assertion.id_token, provider_id),
            request_uri: IDP_REQUEST_URI,
            return_secure_token: true,
            return_idp_credential: true,
        };
        let token: TokenResponse = self.post("signInWithIdp", &body).await?;
        Ok(into_user(token, provider_id))
    }

    /// Provider tokens are bearer tokens with no server-side revocation for
    /// client sign-out; dropping them is the whole operation.
    async fn sign_out(&self, user: &AuthUser) -> Result<(), AuthError> {
        debug!("Signing out {}", user.uid);
        Ok(())
    }
}

fn into_user(token: TokenResponse, provider: &str) -> AuthUser {
    AuthUser {
        uid: token.local_id,
        email: token.email,
        display_name: token.display_name,
        provider: provider.to_string(),
        signed_in_at: Utc::now(),
    }
}

/// Form-encoded assertion for signInWithIdp.
fn idp_post_body(id_token: &str, provider_id: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("id_token", id_token)
        .append_pair("providerId", provider_id)
        .finish()
}

/// The provider's message (e.g. `EMAIL_EXISTS`), or the raw body if it is not JSON.
fn provider_error_message(body: String) -> String {
    serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
