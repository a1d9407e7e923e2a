//! Dashboard state machine for one visit.
//!
//! Each action is split into `begin_*` (validate, raise the in-flight flag, hand
//! out the flow input) and `complete_*`/`fail_*` (store the result, lower the
//! flag). The lock around this state is never held across a remote call.

use serde::Serialize;
use thiserror::Error;

use crate::errors::AppError;
use crate::flows::alerts::{Alert, GenerateAlertsInput};
use crate::flows::summarize::SummarizeContradictionsInput;
use crate::schema::validate_ticker;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} already in progress")]
    Busy(&'static str),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Validation(msg) => AppError::Validation(msg),
            busy @ DashboardError::Busy(_) => AppError::Conflict(busy.to_string()),
        }
    }
}

/// Proof that a request was started against a particular dashboard epoch.
/// Results for an older epoch (the dashboard was reset meanwhile) are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    ticker: Option<String>,
    analysis_text: String,
    summary: Option<String>,
    alerts: Vec<Alert>,
    summarizing: bool,
    generating_alerts: bool,
    epoch: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub title: String,
    pub ticker: Option<String>,
    pub analysis_text: String,
    pub summary: Option<String>,
    pub alerts: Vec<Alert>,
    pub is_summarizing: bool,
    pub is_generating_alerts: bool,
    pub can_summarize: bool,
    pub can_generate_alerts: bool,
}

impl DashboardState {
    /// Accepts a new ticker (upper-cased) and discards results for the old one,
    /// including any still in flight.
    pub fn set_ticker(&mut self, ticker: &str) -> Result<(), DashboardError> {
        validate_ticker(ticker).map_err(|e| DashboardError::Validation(e.to_string()))?;
        self.ticker = Some(ticker.trim().to_uppercase());
        self.summary = None;
        self.alerts.clear();
        self.summarizing = false;
        self.generating_alerts = false;
        self.epoch += 1;
        Ok(())
    }

    pub fn set_analysis_text(&mut self, text: String) {
        self.analysis_text = text;
    }

    pub fn can_summarize(&self) -> bool {
        !self.summarizing && self.ticker.is_some() && !self.analysis_text.is_empty()
    }

    pub fn can_generate_alerts(&self) -> bool {
        !self.generating_alerts && self.ticker.is_some() && self.summary.is_some()
    }

    pub fn begin_summarize(
        &mut self,
    ) -> Result<(SummarizeContradictionsInput, Ticket), DashboardError> {
        let ticker = match (&self.ticker, self.analysis_text.is_empty()) {
            (Some(ticker), false) => ticker.clone(),
            _ => {
                return Err(DashboardError::Validation(
                    "Ticker and contradiction analysis text are required.".to_string(),
                ))
            }
        };
        if self.summarizing {
            return Err(DashboardError::Busy("Summarization"));
        }
        self.summarizing = true;
        Ok((
            SummarizeContradictionsInput {
                ticker,
                contradiction_analysis: self.analysis_text.clone(),
            },
            self.ticket(),
        ))
    }

    /// Returns false if the result was discarded because the dashboard was reset.
    pub fn complete_summarize(&mut self, ticket: Ticket, summary: String) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.summarizing = false;
        self.summary = Some(summary);
        true
    }

    pub fn fail_summarize(&mut self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.summarizing = false;
        }
    }

    pub fn begin_generate_alerts(
        &mut self,
    ) -> Result<(GenerateAlertsInput, Ticket), DashboardError> {
        let (ticker, summary) = match (&self.ticker, &self.summary) {
            (Some(ticker), Some(summary)) => (ticker.clone(), summary.clone()),
            _ => {
                return Err(DashboardError::Validation(
                    "Please set a ticker and generate a contradiction summary first.".to_string(),
                ))
            }
        };
        if self.generating_alerts {
            return Err(DashboardError::Busy("Alert generation"));
        }
        self.generating_alerts = true;
        self.alerts.clear();
        Ok((
            GenerateAlertsInput {
                ticker,
                analysis_summary: summary,
            },
            self.ticket(),
        ))
    }

    pub fn complete_generate_alerts(&mut self, ticket: Ticket, alerts: Vec<Alert>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.generating_alerts = false;
        self.alerts = alerts;
        true
    }

    pub fn fail_generate_alerts(&mut self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.generating_alerts = false;
        }
    }

    /// Clears all analysis state. In-flight results started before the reset are ignored.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = DashboardState {
            epoch,
            ..DashboardState::default()
        };
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            title: match &self.ticker {
                Some(ticker) => format!("Analysis: {ticker}"),
                None => "Financial Analysis".to_string(),
            },
            ticker: self.ticker.clone(),
            analysis_text: self.analysis_text.clone(),
            summary: self.summary.clone(),
            alerts: self.alerts.clone(),
            is_summarizing: self.summarizing,
            is_generating_alerts: self.generating_alerts,
            can_summarize: self.can_summarize(),
            can_generate_alerts: self.can_generate_alerts(),
        }
    }

    fn ticket(&self) -> Ticket {
        Ticket { epoch: self.epoch }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch
    }
}

#[cfg(test)]
impl DashboardState {
    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::alerts::Severity;

    fn ready() -> DashboardState {
        let mut state = DashboardState::default();
        state.set_ticker(" aapl ").unwrap();
        state.set_analysis_text("Analyst ratings mixed; insider selling heavy".into());
        state
    }

    fn alert(severity: Severity) -> Alert {
        Alert {
            message: "Insider selling".into(),
            severity,
            recommendation: "Trim position".into(),
        }
    }

    #[test]
    fn test_set_ticker_uppercases_and_trims() {
        let state = ready();
        assert_eq!(state.ticker(), Some("AAPL"));
        assert_eq!(state.snapshot().title, "Analysis: AAPL");
    }

    #[test]
    fn test_set_ticker_rejects_empty_and_too_long() {
        let mut state = DashboardState::default();
        assert!(matches!(state.set_ticker(""), Err(DashboardError::Validation(_))));
        assert!(matches!(
            state.set_ticker("ABCDEFGHIJKL"),
            Err(DashboardError::Validation(_))
        ));
        assert!(state.ticker().is_none());
    }

    #[test]
    fn test_new_ticker_discards_previous_results() {
        let mut state = ready();
        let (_, ticket) = state.begin_summarize().unwrap();
        state.complete_summarize(ticket, "summary".into());
        state.set_ticker("MSFT").unwrap();
        assert!(state.summary().is_none());
        assert!(state.alerts().is_empty());
        assert!(!state.can_generate_alerts());
    }

    #[test]
    fn test_summary_in_flight_across_ticker_change_is_dropped() {
        let mut state = ready();
        let (input, ticket) = state.begin_summarize().unwrap();
        assert_eq!(input.ticker, "AAPL");

        state.set_ticker("MSFT").unwrap();
        assert!(!state.complete_summarize(ticket, "AAPL summary".into()));

        assert!(state.summary().is_none());
        assert!(matches!(
            state.begin_generate_alerts(),
            Err(DashboardError::Validation(_))
        ));
        let (input, _) = state.begin_summarize().unwrap();
        assert_eq!(input.ticker, "MSFT");
    }

    #[test]
    fn test_alerts_in_flight_across_ticker_change_are_dropped() {
        let mut state = ready();
        let (_, ticket) = state.begin_summarize().unwrap();
        state.complete_summarize(ticket, "AAPL summary".into());
        let (_, ticket) = state.begin_generate_alerts().unwrap();

        state.set_ticker("MSFT").unwrap();
        assert!(!state.complete_generate_alerts(ticket, vec![alert(Severity::High)]));
        assert!(state.alerts().is_empty());
        assert!(!state.snapshot().is_generating_alerts);
    }

    #[test]
    fn test_summarize_requires_ticker_and_text() {
        let mut state = DashboardState::default();
        state.set_analysis_text("text".into());
        assert_eq!(
            state.begin_summarize().unwrap_err(),
            DashboardError::Validation(
                "Ticker and contradiction analysis text are required.".into()
            )
        );

        let mut state = DashboardState::default();
        state.set_ticker("AAPL").unwrap();
        assert!(!state.can_summarize());
        assert!(state.begin_summarize().is_err());
    }

    #[test]
    fn test_duplicate_summarize_rejected_while_in_flight() {
        let mut state = ready();
        let (input, ticket) = state.begin_summarize().unwrap();
        assert_eq!(input.ticker, "AAPL");
        assert!(!state.can_summarize());
        assert_eq!(
            state.begin_summarize().unwrap_err(),
            DashboardError::Busy("Summarization")
        );
        state.fail_summarize(ticket);
        assert!(state.can_summarize());
    }

    #[test]
    fn test_alerts_require_summary() {
        let mut state = ready();
        assert!(!state.can_generate_alerts());
        assert!(matches!(
            state.begin_generate_alerts(),
            Err(DashboardError::Validation(_))
        ));
    }

    #[test]
    fn test_alert_round_keeps_order_and_clears_previous() {
        let mut state = ready();
        let (_, ticket) = state.begin_summarize().unwrap();
        assert!(state.complete_summarize(ticket, "Mixed.".into()));

        let (input, ticket) = state.begin_generate_alerts().unwrap();
        assert_eq!(input.analysis_summary, "Mixed.");
        state.complete_generate_alerts(ticket, vec![alert(Severity::Low), alert(Severity::Critical)]);
        assert_eq!(state.alerts()[0].severity, Severity::Low);

        let (_, ticket) = state.begin_generate_alerts().unwrap();
        assert!(state.alerts().is_empty());
        state.fail_generate_alerts(ticket);
        assert!(state.alerts().is_empty());
        assert!(state.can_generate_alerts());
    }

    #[test]
    fn test_flows_are_not_serialized_against_each_other() {
        let mut state = ready();
        let (_, ticket) = state.begin_summarize().unwrap();
        state.complete_summarize(ticket, "Mixed.".into());
        let _first = state.begin_summarize().unwrap();
        assert!(state.begin_generate_alerts().is_ok());
    }

    #[test]
    fn test_reset_clears_everything_and_drops_stale_results() {
        let mut state = ready();
        let (_, ticket) = state.begin_summarize().unwrap();
        state.reset();

        assert!(!state.complete_summarize(ticket, "late".into()));
        let snapshot = state.snapshot();
        assert!(snapshot.ticker.is_none());
        assert!(snapshot.summary.is_none());
        assert!(snapshot.analysis_text.is_empty());
        assert!(!snapshot.is_summarizing);
        assert_eq!(snapshot.title, "Financial Analysis");
    }

    #[test]
    fn test_busy_maps_to_conflict() {
        let err: AppError = DashboardError::Busy("Summarization").into();
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Summarization already in progress"));
    }
}
