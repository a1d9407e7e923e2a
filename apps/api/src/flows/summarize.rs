//! Summarization flow. Condenses free-text contradiction analysis for a ticker.

use serde::{Deserialize, Serialize};

use crate::flows::prompts::{SUMMARIZE_CONTRADICTIONS_OUTPUT, SUMMARIZE_CONTRADICTIONS_PROMPT};
use crate::flows::{run_flow, Flow, FlowError};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{PromptRequest, TextGenerator};
use crate::schema::{require_non_empty, validate_ticker, SchemaViolation, Validate};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeContradictionsInput {
    /// The stock ticker symbol to analyze.
    pub ticker: String,
    /// The contradiction analysis from diverse sources. May be empty.
    pub contradiction_analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeContradictionsOutput {
    pub summary: String,
}

impl Validate for SummarizeContradictionsInput {
    fn validate(&self) -> Result<(), SchemaViolation> {
        validate_ticker(&self.ticker)
    }
}

impl Validate for SummarizeContradictionsOutput {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_non_empty("summary", &self.summary)
    }
}

pub struct SummarizeContradictionsFlow;

impl Flow for SummarizeContradictionsFlow {
    const NAME: &'static str = "summarizeContradictionsFlow";
    type Input = SummarizeContradictionsInput;
    type Output = SummarizeContradictionsOutput;

    fn render(input: &Self::Input) -> PromptRequest {
        let body = SUMMARIZE_CONTRADICTIONS_PROMPT
            .replace("{ticker}", &input.ticker)
            .replace("{contradictionAnalysis}", &input.contradiction_analysis);
        PromptRequest {
            name: Self::NAME,
            system: JSON_ONLY_SYSTEM,
            prompt: format!("{body}\n\n{SUMMARIZE_CONTRADICTIONS_OUTPUT}"),
        }
    }
}

pub async fn summarize_contradictions(
    generator: &dyn TextGenerator,
    input: &SummarizeContradictionsInput,
) -> Result<SummarizeContradictionsOutput, FlowError> {
    run_flow::<SummarizeContradictionsFlow>(generator, input).await
}
