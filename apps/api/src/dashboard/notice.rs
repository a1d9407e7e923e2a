use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// A dismissible notification for the client to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub variant: NoticeVariant,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            title: title.to_string(),
            description: Some(description.into()),
        }
    }

    pub fn summarization_failed() -> Self {
        Self::destructive(
            "Summarization Failed",
            "Could not summarize the analysis. Please try again.",
        )
    }

    pub fn alert_generation_failed() -> Self {
        Self::destructive(
            "Alert Generation Failed",
            "Could not generate alerts. Please try again.",
        )
    }

    /// Generic failure carrying a message verbatim (auth errors).
    pub fn error(description: impl Into<String>) -> Self {
        Self::destructive("Error", description)
    }

    pub fn signed_out() -> Self {
        Self {
            variant: NoticeVariant::Default,
            title: "Signed out successfully!".to_string(),
            description: None,
        }
    }
}
