pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::dashboard::handlers as dashboard;
use crate::flows::handlers as flows;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Visits
        .route("/api/v1/visits", post(dashboard::handle_open_visit))
        .route(
            "/api/v1/visits/current",
            get(dashboard::handle_current_visit).delete(dashboard::handle_close_visit),
        )
        // Auth
        .route("/api/v1/auth/sign-up", post(auth::handle_sign_up))
        .route("/api/v1/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/v1/auth/federated", post(auth::handle_federated_sign_in))
        .route("/api/v1/auth/sign-out", post(auth::handle_sign_out))
        // Dashboard
        .route("/api/v1/dashboard/ticker", put(dashboard::handle_set_ticker))
        .route(
            "/api/v1/dashboard/analysis",
            put(dashboard::handle_set_analysis),
        )
        .route(
            "/api/v1/dashboard/summarize",
            post(dashboard::handle_summarize),
        )
        .route(
            "/api/v1/dashboard/alerts",
            post(dashboard::handle_generate_alerts),
        )
        // Flows
        .route(
            "/api/v1/flows/summarizeContradictionsFlow",
            post(flows::handle_summarize_flow),
        )
        .route(
            "/api/v1/flows/generateAlertsFlow",
            post(flows::handle_generate_alerts_flow),
        )
        .with_state(state)
}
