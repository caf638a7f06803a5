//! Error types module
//!
//! All failures a try-on session can report are unified under `AppError`. Each
//! variant self-describes how it is presented to the user through the
//! `ErrorMetadata` trait: capture and precondition errors carry a specific,
//! actionable message while collaborator failures collapse into one generic
//! processing-error message.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;

use crate::validation::{MeasurementError, ValidationError};

/// Message shown to the user for any collaborator failure.
pub const PROCESSING_ERROR_MESSAGE: &str = "An error occurred during processing. Please try again.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "INVALID_FILE_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether the user can fix the problem and retry
    fn is_recoverable(&self) -> bool;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// A submission precondition that is not yet satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInput {
    Image,
    Clothing,
    BodyDetails,
}

impl Display for MissingInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MissingInput::Image => write!(f, "image"),
            MissingInput::Clothing => write!(f, "clothing item"),
            MissingInput::BodyDetails => write!(f, "body details"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    #[error("Clothing item not found in catalog: {0}")]
    UnknownClothing(String),

    #[error("Missing information: {}", join_missing(.0))]
    MissingInformation(Vec<MissingInput>),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Collaborator error with source")]
    CollaboratorWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_missing(missing: &[MissingInput]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::CollaboratorWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(ValidationError::InvalidFileType { .. }) => "INVALID_FILE_TYPE",
            AppError::Validation(ValidationError::EmptyFile) => "EMPTY_FILE",
            AppError::Validation(ValidationError::FileTooLarge { .. }) => "FILE_TOO_LARGE",
            AppError::Measurement(_) => "INVALID_MEASUREMENT",
            AppError::UnknownClothing(_) => "UNKNOWN_CLOTHING",
            AppError::MissingInformation(_) => "MISSING_INFORMATION",
            AppError::SubmissionInFlight => "SUBMISSION_IN_FLIGHT",
            AppError::CollaboratorWithSource { .. } => "PROCESSING_ERROR",
            AppError::Download(_) => "DOWNLOAD_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Config(_) | AppError::Internal(_))
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(err) => err.to_string(),
            AppError::Measurement(err) => err.to_string(),
            AppError::UnknownClothing(_) => "Please select an item from the catalog.".to_string(),
            AppError::MissingInformation(missing) => {
                if missing
                    .iter()
                    .any(|m| matches!(m, MissingInput::Image | MissingInput::Clothing))
                {
                    "Please upload your image and select a clothing item.".to_string()
                } else {
                    "Please provide your body details for AI recommendation.".to_string()
                }
            }
            AppError::SubmissionInFlight => {
                "Please wait for the current try-on to finish.".to_string()
            }
            AppError::CollaboratorWithSource { .. } => PROCESSING_ERROR_MESSAGE.to_string(),
            AppError::Download(_) => "The image could not be saved.".to_string(),
            AppError::Config(msg) => msg.clone(),
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_)
            | AppError::Measurement(_)
            | AppError::UnknownClothing(_)
            | AppError::MissingInformation(_)
            | AppError::SubmissionInFlight => LogLevel::Debug,
            AppError::Download(_) => LogLevel::Warn,
            AppError::CollaboratorWithSource { .. }
            | AppError::Config(_)
            | AppError::Internal(_) => LogLevel::Error,
        }
    }
}
