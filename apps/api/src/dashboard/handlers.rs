//! Axum route handlers for visits and the dashboard.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use crate::dashboard::extract::{CurrentVisit, SignedInVisit};
use crate::dashboard::notice::Notice;
use crate::dashboard::state::DashboardSnapshot;
use crate::dashboard::visit::ViewSnapshot;
use crate::errors::AppError;
use crate::flows::alerts::generate_alerts;
use crate::flows::summarize::summarize_contradictions;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TickerRequest {
    pub ticker: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTextRequest {
    pub free_text_input: String,
}

/// POST /api/v1/visits
pub async fn handle_open_visit(State(state): State<AppState>) -> (StatusCode, Json<ViewSnapshot>) {
    let visit = state.visits.open().await;
    info!("Opened visit {} ({} open)", visit.id, state.visits.len().await);
    (StatusCode::CREATED, Json(visit.snapshot()))
}

/// GET /api/v1/visits/current
pub async fn handle_current_visit(CurrentVisit(visit): CurrentVisit) -> Json<ViewSnapshot> {
    Json(visit.snapshot())
}

/// DELETE /api/v1/visits/current
///
/// Unmounts the dashboard; its session subscription is released with the visit.
pub async fn handle_close_visit(
    State(state): State<AppState>,
    CurrentVisit(visit): CurrentVisit,
) -> StatusCode {
    state.visits.close(visit.id).await;
    StatusCode::NO_CONTENT
}

/// PUT /api/v1/dashboard/ticker
pub async fn handle_set_ticker(
    SignedInVisit { visit, .. }: SignedInVisit,
    Json(request): Json<TickerRequest>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let mut dashboard = visit.dashboard().lock();
    dashboard.set_ticker(&request.ticker)?;
    Ok(Json(dashboard.snapshot()))
}

/// PUT /api/v1/dashboard/analysis
pub async fn handle_set_analysis(
    SignedInVisit { visit, .. }: SignedInVisit,
    Json(request): Json<AnalysisTextRequest>,
) -> Json<DashboardSnapshot> {
    let mut dashboard = visit.dashboard().lock();
    dashboard.set_analysis_text(request.free_text_input);
    Json(dashboard.snapshot())
}

/// POST /api/v1/dashboard/summarize
///
/// Runs the summarization flow on the visit's ticker and analysis text.
pub async fn handle_summarize(
    State(state): State<AppState>,
    SignedInVisit { visit, .. }: SignedInVisit,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let (input, ticket) = visit.dashboard().lock().begin_summarize()?;

    let result = summarize_contradictions(state.generator.as_ref(), &input).await;

    let mut dashboard = visit.dashboard().lock();
    match result {
        Ok(output) => {
            dashboard.complete_summarize(ticket, output.summary);
            Ok(Json(dashboard.snapshot()))
        }
        Err(err) => {
            dashboard.fail_summarize(ticket);
            Err(AppError::from_flow(err, Notice::summarization_failed()))
        }
    }
}

/// POST /api/v1/dashboard/alerts
///
/// Runs alert generation on the visit's current summary.
pub async fn handle_generate_alerts(
    State(state): State<AppState>,
    SignedInVisit { visit, .. }: SignedInVisit,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let (input, ticket) = visit.dashboard().lock().begin_generate_alerts()?;

    let result = generate_alerts(state.generator.as_ref(), &input).await;

    let mut dashboard = visit.dashboard().lock();
    match result {
        Ok(output) => {
            dashboard.complete_generate_alerts(ticket, output.alerts);
            Ok(Json(dashboard.snapshot()))
        }
        Err(err) => {
            dashboard.fail_generate_alerts(ticket);
            Err(AppError::from_flow(err, Notice::alert_generation_failed()))
        }
    }
}
