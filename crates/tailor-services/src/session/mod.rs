//! Try-on session
//!
//! A `TryOnSession` owns everything one user's try-on flow needs: the captured
//! inputs, the submission state and handles to the collaborators. It is a cheap
//! `Clone` handle, so a UI can keep one copy for input events while another
//! awaits `submit()`.
//!
//! All state lives behind one mutex. Every check-then-act sequence (gate check
//! before entering `InFlight`, in-flight check before committing an input)
//! happens inside a single critical section, and the lock is never held across
//! an `.await`.
//!
//! ```text
//! capture ──► SessionState ──► gate ──► orchestrator ──► SubmissionState ──► presentation
//!                                             │                  │
//!                                      compositor/advisor   watch channel
//! ```

pub mod capture;
pub mod gate;
mod orchestrator;
pub mod presentation;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use uuid::Uuid;

use tailor_core::{
    BodyDetails, Catalog, ClothingItem, DispatchPolicy, ImageValidator, NoOpNotifier,
    Notification, SessionNotifier, SubmissionState, TailorConfig, UserImage,
};
use tailor_plugins::{create_compositor, create_style_advisor, Compositor, StyleAdvisor};

const DEFAULT_MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Captured inputs and submission state of one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub image: Option<UserImage>,
    pub clothing: Option<ClothingItem>,
    pub body: Option<BodyDetails>,
    pub submission: SubmissionState,
}

struct SessionInner {
    session_id: String,
    catalog: Arc<Catalog>,
    compositor: Arc<dyn Compositor>,
    advisor: Arc<dyn StyleAdvisor>,
    notifier: Arc<dyn SessionNotifier>,
    policy: DispatchPolicy,
    validator: ImageValidator,
    state: Mutex<SessionState>,
    submission_tx: watch::Sender<SubmissionState>,
}

/// Handle to a single-user try-on session
#[derive(Clone)]
pub struct TryOnSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for TryOnSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryOnSession")
            .field("session_id", &self.inner.session_id)
            .field("compositor", &self.inner.compositor.name())
            .field("advisor", &self.inner.advisor.name())
            .field("policy", &self.inner.policy)
            .finish()
    }
}

/// Builder for `TryOnSession`
pub struct TryOnSessionBuilder {
    compositor: Arc<dyn Compositor>,
    advisor: Arc<dyn StyleAdvisor>,
    catalog: Option<Arc<Catalog>>,
    notifier: Option<Arc<dyn SessionNotifier>>,
    policy: DispatchPolicy,
    session_id: Option<String>,
    max_image_size: usize,
}

impl TryOnSessionBuilder {
    pub fn catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn SessionNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn dispatch_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn max_image_size(mut self, bytes: usize) -> Self {
        self.max_image_size = bytes;
        self
    }

    pub fn build(self) -> TryOnSession {
        let session_id = self
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let (submission_tx, _) = watch::channel(SubmissionState::Idle);

        tracing::info!(
            session_id = %session_id,
            compositor = %self.compositor.name(),
            advisor = %self.advisor.name(),
            policy = %self.policy,
            "Try-on session created"
        );

        TryOnSession {
            inner: Arc::new(SessionInner {
                session_id,
                catalog: self.catalog.unwrap_or_else(|| Arc::new(Catalog::builtin())),
                compositor: self.compositor,
                advisor: self.advisor,
                notifier: self.notifier.unwrap_or_else(|| Arc::new(NoOpNotifier)),
                policy: self.policy,
                validator: ImageValidator::new(self.max_image_size),
                state: Mutex::new(SessionState::default()),
                submission_tx,
            }),
        }
    }
}

impl TryOnSession {
    pub fn builder(
        compositor: Arc<dyn Compositor>,
        advisor: Arc<dyn StyleAdvisor>,
    ) -> TryOnSessionBuilder {
        TryOnSessionBuilder {
            compositor,
            advisor,
            catalog: None,
            notifier: None,
            policy: DispatchPolicy::default(),
            session_id: None,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
        }
    }

    /// Build a session with the backends, catalog and limits from configuration
    pub fn from_config(
        config: &TailorConfig,
        notifier: Arc<dyn SessionNotifier>,
    ) -> anyhow::Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin(),
        };

        let mut builder = Self::builder(create_compositor(config)?, create_style_advisor(config)?)
            .catalog(catalog)
            .notifier(notifier)
            .dispatch_policy(config.dispatch_policy)
            .max_image_size(config.max_image_size_bytes());
        if let Some(user_id) = &config.user_id {
            builder = builder.session_id(user_id.clone());
        }

        Ok(builder.build())
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn dispatch_policy(&self) -> DispatchPolicy {
        self.inner.policy
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> SessionState {
        self.lock_state().clone()
    }

    pub fn user_image(&self) -> Option<UserImage> {
        self.lock_state().image.clone()
    }

    pub fn selected_clothing(&self) -> Option<ClothingItem> {
        self.lock_state().clothing.clone()
    }

    pub fn body_details(&self) -> Option<BodyDetails> {
        self.lock_state().body
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.lock_state().submission.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock_state().submission.is_in_flight()
    }

    /// Observe submission state changes
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.inner.submission_tx.subscribe()
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        // State is only ever replaced wholesale, so a poisoned lock still holds a consistent value
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the submission state and publish it. Caller holds the lock.
    fn transition(&self, state: &mut SessionState, next: SubmissionState) {
        tracing::debug!(
            session_id = %self.inner.session_id,
            from = state.submission.status(),
            to = next.status(),
            "Submission state transition"
        );
        state.submission = next.clone();
        self.inner.submission_tx.send_replace(next);
    }

    fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }
}
