//! Result presentation
//!
//! A pure projection of the submission state into what the result panel shows,
//! plus the download action. Nothing here changes the submission state.

use std::path::{Path, PathBuf};

use serde::Serialize;

use tailor_core::{
    AppError, Notification, StyleRecommendation, SubmissionFailure, SubmissionState,
};

use super::TryOnSession;
use crate::download::ResultDownloader;

/// Fallback name when the image reference has no usable trailing segment
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "virtual-try-on.jpg";

/// What the result panel displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ResultView {
    /// Nothing submitted yet
    Placeholder,
    /// Submission in flight; the input surface is blocked
    Loading,
    /// Error banner, with the composite still shown when one arrived
    Error {
        message: String,
        image_url: Option<String>,
    },
    /// Composite image with the style recommendation when available
    Ready {
        image_url: String,
        recommendation: Option<StyleRecommendation>,
    },
}

impl ResultView {
    pub fn project(state: &SubmissionState) -> Self {
        match state {
            SubmissionState::Idle => ResultView::Placeholder,
            SubmissionState::InFlight => ResultView::Loading,
            SubmissionState::Succeeded(result) => ResultView::Ready {
                image_url: result.image_url.clone(),
                recommendation: result.recommendation.clone(),
            },
            SubmissionState::Failed(SubmissionFailure { reason, partial }) => ResultView::Error {
                message: reason.clone(),
                image_url: partial.as_ref().map(|r| r.image_url.clone()),
            },
        }
    }

    /// Whether the interactive surface is disabled
    pub fn blocks_input(&self) -> bool {
        matches!(self, ResultView::Loading)
    }

    /// Image reference offered for download, if any
    pub fn image_url(&self) -> Option<&str> {
        match self {
            ResultView::Ready { image_url, .. } => Some(image_url.as_str()),
            ResultView::Error {
                image_url: Some(image_url),
                ..
            } => Some(image_url.as_str()),
            _ => None,
        }
    }
}

/// A download the user can trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub filename: String,
}

/// File name for a downloaded result: the last path segment of the reference.
///
/// Query strings and fragments are ignored. `data:` URIs and references without
/// a usable segment fall back to `virtual-try-on.jpg`.
pub fn derive_download_filename(image_url: &str) -> String {
    if image_url.starts_with("data:") {
        return DEFAULT_DOWNLOAD_FILENAME.to_string();
    }

    let path = image_url
        .split(['?', '#'])
        .next()
        .unwrap_or(image_url);
    let segment = path.rsplit('/').next().unwrap_or("");

    match segment {
        "" | "." | ".." => DEFAULT_DOWNLOAD_FILENAME.to_string(),
        name if name.contains('\\') => DEFAULT_DOWNLOAD_FILENAME.to_string(),
        name => name.to_string(),
    }
}

impl TryOnSession {
    /// Current result panel contents
    pub fn view(&self) -> ResultView {
        ResultView::project(&self.lock_state().submission)
    }

    /// The download action, present whenever a composite image is displayed
    pub fn download_request(&self) -> Option<DownloadRequest> {
        let state = self.lock_state();
        state.submission.image_url().map(|url| DownloadRequest {
            url: url.to_string(),
            filename: derive_download_filename(url),
        })
    }

    /// Save the displayed composite into `dir`.
    ///
    /// Without a composite this is a no-op returning `Ok(None)`.
    pub async fn download_result(
        &self,
        downloader: &ResultDownloader,
        dir: &Path,
    ) -> Result<Option<PathBuf>, AppError> {
        let Some(request) = self.download_request() else {
            tracing::debug!(
                session_id = %self.inner.session_id,
                "Download requested without a result"
            );
            self.notify(Notification::nothing_to_download());
            return Ok(None);
        };

        let path = downloader.save(&request, dir).await.map_err(|err| {
            tracing::warn!(
                session_id = %self.inner.session_id,
                url = %request.url,
                error = %format!("{:#}", err),
                "Result download failed"
            );
            AppError::Download(err.to_string())
        })?;

        self.notify(Notification::image_downloaded(&request.filename));
        Ok(Some(path))
    }
}
