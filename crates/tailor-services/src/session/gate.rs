//! Completeness gate

use tailor_core::MissingInput;

use super::{SessionState, TryOnSession};

/// Inputs still needed before a submission, in form order
pub fn missing_inputs(state: &SessionState) -> Vec<MissingInput> {
    let mut missing = Vec::new();
    if state.image.is_none() {
        missing.push(MissingInput::Image);
    }
    if state.clothing.is_none() {
        missing.push(MissingInput::Clothing);
    }
    if state.body.is_none() {
        missing.push(MissingInput::BodyDetails);
    }
    missing
}

/// True when all inputs are present and nothing is in flight
pub fn can_submit(state: &SessionState) -> bool {
    state.image.is_some()
        && state.clothing.is_some()
        && state.body.is_some()
        && !state.submission.is_in_flight()
}

impl TryOnSession {
    pub fn can_submit(&self) -> bool {
        can_submit(&self.lock_state())
    }

    pub fn missing_inputs(&self) -> Vec<MissingInput> {
        missing_inputs(&self.lock_state())
    }
}
