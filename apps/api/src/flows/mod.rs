//! Generation flows: validated input → rendered prompt → one remote call →
//! validated output. Flows are stateless; the generator is passed in.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, PromptRequest, TextGenerator};
use crate::schema::Validate;

pub mod alerts;
pub mod handlers;
pub mod prompts;
pub mod summarize;
#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum FlowError {
    /// Input rejected locally; the generator was not called.
    #[error("{0}")]
    Validation(String),

    /// Transport failure, or a response that does not conform to the output schema.
    #[error("{0}")]
    Generation(String),
}

/// A named operation binding an input schema, a prompt template and an output schema.
pub trait Flow {
    const NAME: &'static str;
    type Input: Validate + Sync;
    type Output: DeserializeOwned + Validate;

    fn render(input: &Self::Input) -> PromptRequest;
}

/// Runs a flow once. No retries; the first failure is returned.
pub async fn run_flow<F: Flow>(
    generator: &dyn TextGenerator,
    input: &F::Input,
) -> Result<F::Output, FlowError> {
    input
        .validate()
        .map_err(|e| FlowError::Validation(e.to_string()))?;

    let request = F::render(input);
    info!(flow = F::NAME, "Running flow");

    let text = generator.generate(&request).await.map_err(|e| {
        warn!(flow = F::NAME, "Generation call failed: {e}");
        FlowError::Generation(format!("{} call failed: {e}", F::NAME))
    })?;

    parse_output::<F::Output>(&text).map_err(|reason| {
        warn!(flow = F::NAME, "Response rejected: {reason}");
        FlowError::Generation(format!("{} returned invalid output: {reason}", F::NAME))
    })
}

/// Parses generated text as JSON and validates it. All-or-nothing.
pub fn parse_output<T: DeserializeOwned + Validate>(text: &str) -> Result<T, String> {
    let value: T = serde_json::from_str(strip_json_fences(text)).map_err(|e| e.to_string())?;
    value.validate().map_err(|e| e.to_string())?;
    Ok(value)
}

/// Handlebars-style escaping for `{{placeholder}}` substitutions.
pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(c),
        }
    }
    out
}
