//! Test helpers for session flow tests
//!
//! Recording collaborators that capture every request they receive and can be
//! told to succeed, fail, block until released, or panic.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;

use tailor_core::{
    CompositeRequest, CompositeResponse, ImageSource, ImageUpload, Notification,
    RecommendationRequest, SessionNotifier, StyleRecommendation,
};
use tailor_services::{Compositor, StyleAdvisor, TryOnSession};

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
pub const RESULT_URL: &str = "https://picsum.photos/seed/42/400/600";

#[derive(Debug)]
enum Behavior {
    Succeed(String),
    Fail(String),
    Block(String, Arc<Notify>),
    Panic,
}

#[derive(Debug)]
pub struct RecordingCompositor {
    behavior: Behavior,
    calls: Mutex<Vec<CompositeRequest>>,
}

impl RecordingCompositor {
    fn with(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn succeeding(image_url: &str) -> Arc<Self> {
        Self::with(Behavior::Succeed(image_url.to_string()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with(Behavior::Fail(message.to_string()))
    }

    /// Blocks every call until the returned handle is notified
    pub fn blocking(image_url: &str) -> (Arc<Self>, Arc<Notify>) {
        let release = Arc::new(Notify::new());
        (
            Self::with(Behavior::Block(image_url.to_string(), release.clone())),
            release,
        )
    }

    pub fn panicking() -> Arc<Self> {
        Self::with(Behavior::Panic)
    }

    pub fn calls(&self) -> Vec<CompositeRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Compositor for RecordingCompositor {
    fn name(&self) -> &str {
        "recording"
    }

    async fn composite(&self, request: CompositeRequest) -> Result<CompositeResponse> {
        self.calls.lock().unwrap().push(request);
        match &self.behavior {
            Behavior::Succeed(url) => Ok(CompositeResponse {
                image_url: url.clone(),
            }),
            Behavior::Fail(message) => Err(anyhow::anyhow!(message.clone())),
            Behavior::Block(url, release) => {
                release.notified().await;
                Ok(CompositeResponse {
                    image_url: url.clone(),
                })
            }
            Behavior::Panic => panic!("compositor exploded"),
        }
    }
}

#[derive(Debug)]
pub struct RecordingAdvisor {
    result: std::result::Result<StyleRecommendation, String>,
    calls: Mutex<Vec<RecommendationRequest>>,
}

impl RecordingAdvisor {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            result: Ok(StyleRecommendation {
                recommendation: "Dark wash straight-leg jeans".to_string(),
                reasoning: "A straight leg balances a 175 cm frame".to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecommendationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StyleAdvisor for RecordingAdvisor {
    fn name(&self) -> &str {
        "recording"
    }

    async fn recommend(&self, request: RecommendationRequest) -> Result<StyleRecommendation> {
        self.calls.lock().unwrap().push(request);
        self.result.clone().map_err(|message| anyhow::anyhow!(message))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

impl SessionNotifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub struct Harness {
    pub session: TryOnSession,
    pub compositor: Arc<RecordingCompositor>,
    pub advisor: Arc<RecordingAdvisor>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(compositor: Arc<RecordingCompositor>, advisor: Arc<RecordingAdvisor>) -> Harness {
    let notifier = RecordingNotifier::new();
    let session = TryOnSession::builder(compositor.clone(), advisor.clone())
        .notifier(notifier.clone())
        .session_id("user_id_123")
        .max_image_size(1024)
        .build();

    Harness {
        session,
        compositor,
        advisor,
        notifier,
    }
}

pub fn jpeg_upload() -> ImageUpload {
    ImageUpload::new(
        ImageSource::FilePicker,
        "me.jpg",
        Some("image/jpeg".to_string()),
        JPEG_BYTES,
    )
}

pub fn pdf_upload() -> ImageUpload {
    ImageUpload::new(
        ImageSource::FilePicker,
        "resume.pdf",
        Some("application/pdf".to_string()),
        &b"%PDF-1.7"[..],
    )
}

/// Fill in a photo, the Denim Jeans and 175 cm / 70 kg
pub fn fill_inputs(session: &TryOnSession) {
    session.acquire_image(jpeg_upload()).unwrap();
    session.select_clothing("2").unwrap();
    session.submit_body_details("175", "70").unwrap();
}
