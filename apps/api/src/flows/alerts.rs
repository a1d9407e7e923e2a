//! Alert-generation flow. Turns an analysis summary into severity-tagged alerts.
//! Alerts keep the order the model returned; nothing is re-sorted or deduplicated.

use serde::{Deserialize, Serialize};

use crate::flows::prompts::{GENERATE_ALERTS_OUTPUT, GENERATE_ALERTS_PROMPT};
use crate::flows::{escape_html, run_flow, Flow, FlowError};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{PromptRequest, TextGenerator};
use crate::schema::{require_non_empty, validate_each, validate_ticker, SchemaViolation, Validate};

/// Alert urgency. Unknown values fail deserialization rather than being coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAlertsInput {
    pub ticker: String,
    /// Summary of the analysis, including contradictions, confirmations and confidence.
    pub analysis_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateAlertsOutput {
    pub alerts: Vec<Alert>,
}

impl Validate for Alert {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_non_empty("message", &self.message)?;
        require_non_empty("recommendation", &self.recommendation)
    }
}

impl Validate for GenerateAlertsInput {
    fn validate(&self) -> Result<(), SchemaViolation> {
        validate_ticker(&self.ticker)?;
        require_non_empty("analysisSummary", &self.analysis_summary)
    }
}

impl Validate for GenerateAlertsOutput {
    fn validate(&self) -> Result<(), SchemaViolation> {
        validate_each("alerts", &self.alerts)
    }
}

pub struct GenerateAlertsFlow;

impl Flow for GenerateAlertsFlow {
    const NAME: &'static str = "generateAlertsFlow";
    type Input = GenerateAlertsInput;
    type Output = GenerateAlertsOutput;

    fn render(input: &Self::Input) -> PromptRequest {
        let body = GENERATE_ALERTS_PROMPT
            .replace("{ticker}", &input.ticker)
            .replace("{analysisSummary}", &escape_html(&input.analysis_summary));
        PromptRequest {
            name: Self::NAME,
            system: JSON_ONLY_SYSTEM,
            prompt: format!("{body}\n\n{GENERATE_ALERTS_OUTPUT}"),
        }
    }
}

pub async fn generate_alerts(
    generator: &dyn TextGenerator,
    input: &GenerateAlertsInput,
) -> Result<GenerateAlertsOutput, FlowError> {
    run_flow::<GenerateAlertsFlow>(generator, input).await
}
