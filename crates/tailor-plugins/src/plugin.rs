//! Collaborator traits
//!
//! Implementations report failures as `anyhow` errors with full context. The
//! session logs them and shows the user a single generic message.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

use tailor_core::{CompositeRequest, CompositeResponse, RecommendationRequest, StyleRecommendation};

/// Renders the user's photo wearing a garment
#[async_trait]
pub trait Compositor: Send + Sync + Debug {
    /// Backend name/identifier
    fn name(&self) -> &str;

    /// Produce exactly one reference to the composited image
    async fn composite(&self, request: CompositeRequest) -> Result<CompositeResponse>;
}

/// Generates a style recommendation from body measurements
#[async_trait]
pub trait StyleAdvisor: Send + Sync + Debug {
    /// Backend name/identifier
    fn name(&self) -> &str;

    /// Recommend how to wear the desired garment. Both output fields are non-empty.
    async fn recommend(&self, request: RecommendationRequest) -> Result<StyleRecommendation>;
}
