//! Input capture: image acquisition, catalog selection and measurement entry
//!
//! Each operation validates before touching the session. A rejected input leaves
//! the previously accepted value in place. While a submission is in flight all
//! inputs are locked and every capture fails with `SubmissionInFlight`.

use tailor_core::{
    validation::parse_body_details, AppError, BodyDetails, ClothingItem, ImageUpload,
    Notification, SubmissionState, UserImage, ValidationError,
};

use super::{SessionState, TryOnSession};

impl TryOnSession {
    /// Accept a photo from the file picker or the camera.
    ///
    /// On success the preview is recomputed and any displayed result is cleared.
    pub fn acquire_image(&self, upload: ImageUpload) -> Result<UserImage, AppError> {
        let content_type = match self
            .inner
            .validator
            .validate_all(upload.content_type.as_deref(), &upload.data)
        {
            Ok(content_type) => content_type,
            Err(err) => {
                tracing::warn!(
                    session_id = %self.inner.session_id,
                    source = ?upload.source,
                    filename = %upload.filename,
                    error = %err,
                    "Image rejected"
                );
                self.notify(match &err {
                    ValidationError::InvalidFileType { .. } => Notification::invalid_file_type(),
                    other => Notification::invalid_image(other.to_string()),
                });
                return Err(err.into());
            }
        };

        let image = UserImage::new(upload.filename, content_type, upload.data);
        {
            let mut state = self.lock_state();
            ensure_idle(&state)?;
            state.image = Some(image.clone());
            self.clear_stale_result(&mut state);
        }

        tracing::info!(
            session_id = %self.inner.session_id,
            filename = %image.filename(),
            content_type = %image.content_type(),
            size = image.size(),
            "Image accepted"
        );
        self.notify(Notification::image_selected(image.filename()));

        Ok(image)
    }

    /// Select a catalog item by id. Any displayed result is cleared.
    pub fn select_clothing(&self, id: &str) -> Result<ClothingItem, AppError> {
        let item = self
            .inner
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::UnknownClothing(id.to_string()))?;

        {
            let mut state = self.lock_state();
            ensure_idle(&state)?;
            state.clothing = Some(item.clone());
            self.clear_stale_result(&mut state);
        }

        tracing::info!(
            session_id = %self.inner.session_id,
            clothing_id = %item.id,
            clothing_name = %item.name,
            "Clothing selected"
        );

        Ok(item)
    }

    /// Validate and record height/weight from raw form text.
    ///
    /// A displayed result stays on screen; only an error banner is dismissed.
    pub fn submit_body_details(
        &self,
        height_text: &str,
        weight_text: &str,
    ) -> Result<BodyDetails, AppError> {
        let details = parse_body_details(height_text, weight_text).map_err(|err| {
            tracing::debug!(
                session_id = %self.inner.session_id,
                field = %err.field,
                error = %err,
                "Body details rejected"
            );
            AppError::from(err)
        })?;

        {
            let mut state = self.lock_state();
            ensure_idle(&state)?;
            state.body = Some(details);
            let dismissed = match &state.submission {
                SubmissionState::Failed(failure) => Some(match &failure.partial {
                    Some(result) => SubmissionState::Succeeded(result.clone()),
                    None => SubmissionState::Idle,
                }),
                _ => None,
            };
            if let Some(next) = dismissed {
                self.transition(&mut state, next);
            }
        }

        tracing::info!(
            session_id = %self.inner.session_id,
            height_cm = details.height_cm,
            weight_kg = details.weight_kg,
            "Body details saved"
        );
        self.notify(Notification::body_details_saved());

        Ok(details)
    }

    /// Drop a result or error that no longer matches the inputs
    fn clear_stale_result(&self, state: &mut SessionState) {
        if matches!(
            state.submission,
            SubmissionState::Succeeded(_) | SubmissionState::Failed(_)
        ) {
            self.transition(state, SubmissionState::Idle);
        }
    }
}

fn ensure_idle(state: &SessionState) -> Result<(), AppError> {
    if state.submission.is_in_flight() {
        return Err(AppError::SubmissionInFlight);
    }
    Ok(())
}
