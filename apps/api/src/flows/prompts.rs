// Prompt templates for the two generation flows.
// Placeholders are `{name}`; renderers substitute the ticker first so user text is never re-scanned.

/// Summarization prompt. Replace `{ticker}` and `{contradictionAnalysis}` before sending.
pub const SUMMARIZE_CONTRADICTIONS_PROMPT: &str = "Summarize the following contradiction analysis for the stock ticker {ticker}.

Contradiction Analysis:
{contradictionAnalysis}

Summary:";

/// Output contract appended to the summarization prompt.
pub const SUMMARIZE_CONTRADICTIONS_OUTPUT: &str = r#"Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "The summarized contradiction analysis."
}"#;

/// Alert prompt. Replace `{ticker}` and `{analysisSummary}` before sending.
/// `{analysisSummary}` is HTML-escaped on substitution; `{ticker}` is inserted raw.
pub const GENERATE_ALERTS_PROMPT: &str = "You are an AI assistant specialized in generating actionable stock trading alerts and recommendations.

  Based on the analysis summary provided for the stock ticker {ticker}, generate a list of alerts with actionable recommendations.

  Analysis Summary:
  {analysisSummary}

  Each alert should include a message, a severity level (critical, high, medium, or low), and an actionable recommendation.
  The alerts and recommendations should be based on the analysis summary, such as contradictory signals, significant confirmations, or low confidence.
  ";

/// Output contract appended to the alert prompt.
pub const GENERATE_ALERTS_OUTPUT: &str = r#"Return a JSON object with this EXACT schema (no extra fields):
{
  "alerts": [
    {
      "message": "The alert message.",
      "severity": "critical" | "high" | "medium" | "low",
      "recommendation": "An actionable recommendation based on the alert."
    }
  ]
}

RULES:
1. severity must be exactly one of: critical, high, medium, low (lower case)
2. message and recommendation must be non-empty
3. Return ONLY the JSON object — nothing else, no code fences."#;
