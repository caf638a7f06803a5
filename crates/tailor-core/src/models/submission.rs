use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::StyleRecommendation;

/// Merged outcome of one submission cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryOnResult {
    /// Reference to the composited try-on image
    pub image_url: String,
    /// Style advice, absent when the text generator did not deliver
    pub recommendation: Option<StyleRecommendation>,
    pub completed_at: DateTime<Utc>,
}

/// Why a submission failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionFailure {
    /// User-facing reason
    pub reason: String,
    /// Composite that arrived before the failure, if any
    pub partial: Option<TryOnResult>,
}

/// Submission lifecycle of a session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(TryOnResult),
    Failed(SubmissionFailure),
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::InFlight)
    }

    /// The composite image currently on display, if any
    pub fn image_url(&self) -> Option<&str> {
        match self {
            SubmissionState::Succeeded(result) => Some(result.image_url.as_str()),
            SubmissionState::Failed(SubmissionFailure {
                partial: Some(result),
                ..
            }) => Some(result.image_url.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::InFlight => "in_flight",
            SubmissionState::Succeeded(_) => "succeeded",
            SubmissionState::Failed(_) => "failed",
        }
    }
}
