//! Axum route handlers exposing each flow as a named, stateless operation.

use axum::{extract::State, Json};

use crate::dashboard::extract::SignedInVisit;
use crate::dashboard::notice::Notice;
use crate::errors::AppError;
use crate::flows::alerts::{generate_alerts, GenerateAlertsInput, GenerateAlertsOutput};
use crate::flows::summarize::{
    summarize_contradictions, SummarizeContradictionsInput, SummarizeContradictionsOutput,
};
use crate::state::AppState;

/// POST /api/v1/flows/summarizeContradictionsFlow
pub async fn handle_summarize_flow(
    State(state): State<AppState>,
    _visit: SignedInVisit,
    Json(input): Json<SummarizeContradictionsInput>,
) -> Result<Json<SummarizeContradictionsOutput>, AppError> {
    summarize_contradictions(state.generator.as_ref(), &input)
        .await
        .map(Json)
        .map_err(|e| AppError::from_flow(e, Notice::summarization_failed()))
}

/// POST /api/v1/flows/generateAlertsFlow
pub async fn handle_generate_alerts_flow(
    State(state): State<AppState>,
    _visit: SignedInVisit,
    Json(input): Json<GenerateAlertsInput>,
) -> Result<Json<GenerateAlertsOutput>, AppError> {
    generate_alerts(state.generator.as_ref(), &input)
        .await
        .map(Json)
        .map_err(|e| AppError::from_flow(e, Notice::alert_generation_failed()))
}
