//! Request extractors resolving the `x-visit-id` header to a live visit.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::dashboard::visit::Visit;
use crate::errors::AppError;
use crate::state::AppState;

pub const VISIT_HEADER: &str = "x-visit-id";

/// Any open visit, signed in or not.
pub struct CurrentVisit(pub Arc<Visit>);

/// A visit with a session. Anything else is `401`.
pub struct SignedInVisit {
    pub visit: Arc<Visit>,
    pub user: AuthUser,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentVisit {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let raw = parts
            .headers
            .get(VISIT_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Validation(format!("Missing {VISIT_HEADER} header")))?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::Validation(format!("Malformed {VISIT_HEADER} header")))?;

        state
            .visits
            .get(id)
            .await
            .map(CurrentVisit)
            .ok_or_else(|| AppError::NotFound(format!("Visit {id} not found")))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SignedInVisit {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let CurrentVisit(visit) = CurrentVisit::from_request_parts(parts, state).await?;
        let user = visit.user().ok_or(AppError::Unauthorized)?;
        Ok(SignedInVisit { visit, user })
    }
}
