//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use faqbot_core::AppError;

/// A trimmed, non-empty block of the knowledge document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Position of the section in the document (0-based)
    pub position: usize,

    /// Section text, whitespace-trimmed
    pub text: String,
}

impl Section {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    /// First `max_chars` characters of the section.
    pub fn preview(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}

/// Outcome of matching a query against the embedding index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    /// Best section, present only when it passed the confidence gate
    pub section: Option<&'a Section>,

    /// Best cosine similarity; `None` when the index is empty
    pub score: Option<f32>,
}

impl<'a> MatchResult<'a> {
    /// Result for an empty knowledge base.
    pub fn empty() -> Self {
        Self {
            section: None,
            score: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.section.is_some()
    }
}

/// Simulated user reaction to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLabel {
    Good,
    TooVague,
    NotHelpful,
}

impl FeedbackLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::TooVague => "too vague",
            Self::NotHelpful => "not helpful",
        }
    }

    /// Title-cased label used in transcripts.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::TooVague => "Too Vague",
            Self::NotHelpful => "Not Helpful",
        }
    }
}

impl fmt::Display for FeedbackLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackLabel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "good" => Ok(Self::Good),
            "too_vague" | "vague" => Ok(Self::TooVague),
            "not_helpful" | "unhelpful" => Ok(Self::NotHelpful),
            _ => Err(AppError::Other(format!(
                "Unknown feedback label: '{}'. Expected good, too_vague or not_helpful",
                s
            ))),
        }
    }
}

/// One pass of the refinement loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementStep {
    /// 1-based iteration number
    pub iteration: usize,

    /// Label drawn for the response under review
    pub feedback: FeedbackLabel,

    /// Revised response; `None` when the feedback was good
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted: Option<String>,
}

/// Full history of one refinement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementOutcome {
    pub query: String,
    pub initial: String,
    pub steps: Vec<RefinementStep>,
}

impl RefinementOutcome {
    pub fn new(query: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            initial: initial.into(),
            steps: Vec::new(),
        }
    }

    /// Number of feedback iterations performed.
    pub fn iterations(&self) -> usize {
        self.steps.len()
    }

    /// Whether the loop ended on good feedback.
    pub fn accepted(&self) -> bool {
        self.steps
            .last()
            .is_some_and(|step| step.feedback == FeedbackLabel::Good)
    }

    /// Response standing at the end of the loop.
    pub fn final_response(&self) -> &str {
        self.steps
            .iter()
            .rev()
            .find_map(|step| step.adjusted.as_deref())
            .unwrap_or(&self.initial)
    }

    /// Human-readable transcript of the run.
    pub fn render(&self) -> String {
        let mut lines = vec![format!("**Initial Response:** {}", self.initial)];

        for step in &self.steps {
            match step.feedback {
                FeedbackLabel::Good => {
                    lines.push(format!("\n**Feedback {}:** ✅ Good", step.iteration));
                }
                label => {
                    lines.push(format!(
                        "\n**Feedback {}:** ⚠️ {}",
                        step.iteration,
                        label.title()
                    ));
                    if let Some(adjusted) = &step.adjusted {
                        lines.push(format!("**Adjusted Response:** {}", adjusted));
                    }
                }
            }
        }

        lines.join("\n")
    }
}
