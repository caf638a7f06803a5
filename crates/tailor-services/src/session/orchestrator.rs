//! Submission orchestrator
//!
//! `Idle -> InFlight -> {Succeeded, Failed}`. Entering `InFlight` is atomic with
//! the gate check, and leaving it happens on every path, including a panicking
//! collaborator or a dropped `submit()` future.

use chrono::Utc;
use validator::Validate;

use tailor_core::{
    AppError, CompositeRequest, DispatchPolicy, ErrorMetadata, MissingInput, Notification,
    RecommendationRequest, StyleRecommendation, SubmissionFailure, SubmissionState, TryOnResult,
    PROCESSING_ERROR_MESSAGE,
};

use super::{gate, TryOnSession};

/// What came back from the collaborators
enum DispatchOutcome {
    Completed {
        image_url: String,
        recommendation: StyleRecommendation,
    },
    InvalidRequest(anyhow::Error),
    CompositeFailed(anyhow::Error),
    RecommendationFailed {
        image_url: String,
        error: anyhow::Error,
    },
}

/// Moves the session out of `InFlight` if the submission never finishes normally
struct InFlightGuard<'a> {
    session: &'a TryOnSession,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                session_id = %self.session.inner.session_id,
                "Submission abandoned before completion"
            );
            let mut state = self.session.lock_state();
            if state.submission.is_in_flight() {
                self.session.transition(
                    &mut state,
                    SubmissionState::Failed(SubmissionFailure {
                        reason: PROCESSING_ERROR_MESSAGE.to_string(),
                        partial: None,
                    }),
                );
            }
        }
    }
}

impl TryOnSession {
    /// Run one try-on: composite the image, then fetch the style recommendation.
    ///
    /// Rejected without side effects when inputs are missing or another
    /// submission is in flight. Collaborator failures end in `Failed` with one
    /// generic message and are returned as `AppError::CollaboratorWithSource`.
    pub async fn submit(&self) -> Result<TryOnResult, AppError> {
        let (image, clothing, body) = {
            let mut state = self.lock_state();

            if state.submission.is_in_flight() {
                return Err(AppError::SubmissionInFlight);
            }

            let missing = gate::missing_inputs(&state);
            if !missing.is_empty() {
                drop(state);
                return Err(self.reject_incomplete(missing));
            }

            let inputs = match (&state.image, &state.clothing, state.body) {
                (Some(image), Some(clothing), Some(body)) => {
                    (image.clone(), clothing.clone(), body)
                }
                _ => {
                    return Err(AppError::Internal(
                        "Gate passed with missing inputs".to_string(),
                    ))
                }
            };

            self.transition(&mut state, SubmissionState::InFlight);
            inputs
        };

        let guard = InFlightGuard {
            session: self,
            armed: true,
        };

        tracing::info!(
            session_id = %self.inner.session_id,
            clothing_id = %clothing.id,
            policy = %self.inner.policy,
            "Submission started"
        );

        let composite_request =
            CompositeRequest::new(image, &clothing, self.inner.session_id.clone());
        let recommendation_request = RecommendationRequest::new(body, &clothing);

        let outcome = self.dispatch(composite_request, recommendation_request).await;
        let (next, result) = self.settle(outcome);

        {
            let mut state = self.lock_state();
            self.transition(&mut state, next);
        }
        guard.disarm();

        match &result {
            Ok(_) => self.notify(Notification::try_on_ready()),
            Err(_) => self.notify(Notification::processing_error()),
        }

        result
    }

    async fn dispatch(
        &self,
        composite_request: CompositeRequest,
        recommendation_request: RecommendationRequest,
    ) -> DispatchOutcome {
        if let Err(errors) = recommendation_request.validate() {
            return DispatchOutcome::InvalidRequest(anyhow::anyhow!(
                "Invalid recommendation request: {}",
                errors
            ));
        }

        let compositor = &self.inner.compositor;
        let advisor = &self.inner.advisor;

        match self.inner.policy {
            DispatchPolicy::Sequential => {
                let image_url = match compositor.composite(composite_request).await {
                    Ok(response) => response.image_url,
                    Err(error) => return DispatchOutcome::CompositeFailed(error),
                };
                match advisor.recommend(recommendation_request).await {
                    Ok(recommendation) => DispatchOutcome::Completed {
                        image_url,
                        recommendation,
                    },
                    Err(error) => DispatchOutcome::RecommendationFailed { image_url, error },
                }
            }
            DispatchPolicy::Concurrent => {
                let (composite, recommendation) = tokio::join!(
                    compositor.composite(composite_request),
                    advisor.recommend(recommendation_request)
                );
                match (composite, recommendation) {
                    (Ok(response), Ok(recommendation)) => DispatchOutcome::Completed {
                        image_url: response.image_url,
                        recommendation,
                    },
                    (Ok(response), Err(error)) => DispatchOutcome::RecommendationFailed {
                        image_url: response.image_url,
                        error,
                    },
                    (Err(error), _) => DispatchOutcome::CompositeFailed(error),
                }
            }
        }
    }

    /// Map collaborator outcomes onto the terminal state and the caller's result
    fn settle(&self, outcome: DispatchOutcome) -> (SubmissionState, Result<TryOnResult, AppError>) {
        let session_id = &self.inner.session_id;

        match outcome {
            DispatchOutcome::Completed {
                image_url,
                recommendation,
            } => {
                let result = TryOnResult {
                    image_url,
                    recommendation: Some(recommendation),
                    completed_at: Utc::now(),
                };
                tracing::info!(
                    session_id = %session_id,
                    image_url = %result.image_url,
                    "Submission succeeded"
                );
                (SubmissionState::Succeeded(result.clone()), Ok(result))
            }
            DispatchOutcome::InvalidRequest(error) => {
                tracing::error!(
                    session_id = %session_id,
                    error = %error,
                    "Submission not dispatched"
                );
                let failure = SubmissionFailure {
                    reason: PROCESSING_ERROR_MESSAGE.to_string(),
                    partial: None,
                };
                (SubmissionState::Failed(failure), Err(AppError::from(error)))
            }
            DispatchOutcome::CompositeFailed(error) => {
                tracing::error!(
                    session_id = %session_id,
                    compositor = %self.inner.compositor.name(),
                    error = %format!("{:#}", error),
                    "Composite failed"
                );
                let failure = SubmissionFailure {
                    reason: PROCESSING_ERROR_MESSAGE.to_string(),
                    partial: None,
                };
                (SubmissionState::Failed(failure), Err(AppError::from(error)))
            }
            DispatchOutcome::RecommendationFailed { image_url, error } => {
                tracing::error!(
                    session_id = %session_id,
                    advisor = %self.inner.advisor.name(),
                    image_url = %image_url,
                    error = %format!("{:#}", error),
                    "Style recommendation failed"
                );
                let failure = SubmissionFailure {
                    reason: PROCESSING_ERROR_MESSAGE.to_string(),
                    partial: Some(TryOnResult {
                        image_url,
                        recommendation: None,
                        completed_at: Utc::now(),
                    }),
                };
                (SubmissionState::Failed(failure), Err(AppError::from(error)))
            }
        }
    }

    fn reject_incomplete(&self, missing: Vec<MissingInput>) -> AppError {
        let needs_selection = missing
            .iter()
            .any(|m| matches!(m, MissingInput::Image | MissingInput::Clothing));
        let err = AppError::MissingInformation(missing);

        tracing::debug!(
            session_id = %self.inner.session_id,
            error_code = err.error_code(),
            error = %err,
            "Submission rejected"
        );

        let message = err.client_message();
        self.notify(if needs_selection {
            Notification::missing_information(message)
        } else {
            Notification::missing_body_details(message)
        });

        err
    }
}
