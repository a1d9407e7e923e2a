//! Axum route handlers for sign-up, sign-in and sign-out.
//!
//! Each call binds the resulting session to the requesting visit, which moves
//! it between the login and dashboard routes.

use axum::{extract::State, Json};

use crate::auth::{Credentials, FederatedAssertion};
use crate::dashboard::extract::{CurrentVisit, SignedInVisit};
use crate::dashboard::notice::Notice;
use crate::dashboard::visit::ViewSnapshot;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    CurrentVisit(visit): CurrentVisit,
    Json(credentials): Json<Credentials>,
) -> Result<Json<ViewSnapshot>, AppError> {
    credentials.validate()?;
    let user = state.identity.create_account(&credentials).await?;
    visit.sign_in(user);
    Ok(Json(visit.snapshot()))
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    CurrentVisit(visit): CurrentVisit,
    Json(credentials): Json<Credentials>,
) -> Result<Json<ViewSnapshot>, AppError> {
    credentials.validate()?;
    let user = state.identity.sign_in(&credentials).await?;
    visit.sign_in(user);
    Ok(Json(visit.snapshot()))
}

/// POST /api/v1/auth/federated
pub async fn handle_federated_sign_in(
    State(state): State<AppState>,
    CurrentVisit(visit): CurrentVisit,
    Json(assertion): Json<FederatedAssertion>,
) -> Result<Json<ViewSnapshot>, AppError> {
    assertion.validate()?;
    let user = state.identity.sign_in_with_federated(&assertion).await?;
    visit.sign_in(user);
    Ok(Json(visit.snapshot()))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    SignedInVisit { visit, user }: SignedInVisit,
) -> Result<Json<ViewSnapshot>, AppError> {
    state.identity.sign_out(&user).await?;
    visit.sign_out();
    Ok(Json(ViewSnapshot {
        notice: Some(Notice::signed_out()),
        ..visit.snapshot()
    }))
}
