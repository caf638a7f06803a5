//! Offline collaborator backends
//!
//! `SimulatedCompositor` stands in for a real try-on model: it waits a fixed
//! delay and returns a random placeholder photo. `SimulatedStyleAdvisor` writes
//! a rule-based recommendation from the body mass index.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use validator::Validate;

use crate::plugin::{Compositor, StyleAdvisor};
use tailor_core::{CompositeRequest, CompositeResponse, RecommendationRequest, StyleRecommendation};

const PLACEHOLDER_BASE: &str = "https://picsum.photos/seed";
const PLACEHOLDER_SEEDS: u32 = 1000;

/// Compositor that fakes a backend round trip
#[derive(Debug, Clone)]
pub struct SimulatedCompositor {
    delay: Duration,
}

impl SimulatedCompositor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedCompositor {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl Compositor for SimulatedCompositor {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn composite(&self, request: CompositeRequest) -> Result<CompositeResponse> {
        tracing::debug!(
            session_id = %request.session_id,
            garment_image = %request.garment_image,
            delay_ms = self.delay.as_millis() as u64,
            "Simulating try-on composite"
        );

        sleep(self.delay).await;

        let seed = rand::rng().random_range(0..PLACEHOLDER_SEEDS);
        Ok(CompositeResponse {
            image_url: format!("{}/{}/400/600", PLACEHOLDER_BASE, seed),
        })
    }
}

/// Rule-based style advisor for offline use
#[derive(Debug, Clone, Default)]
pub struct SimulatedStyleAdvisor {
    delay: Duration,
}

impl SimulatedStyleAdvisor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn body_mass_index(height_cm: u32, weight_kg: u32) -> f64 {
        let height_m = f64::from(height_cm) / 100.0;
        f64::from(weight_kg) / (height_m * height_m)
    }
}

#[async_trait]
impl StyleAdvisor for SimulatedStyleAdvisor {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn recommend(&self, request: RecommendationRequest) -> Result<StyleRecommendation> {
        request
            .validate()
            .context("Invalid recommendation request")?;

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let bmi = Self::body_mass_index(request.height, request.weight);
        let garment = request.desired_clothing.to_lowercase();
        let (fit, why) = if bmi < 18.5 {
            (
                "a structured, slightly relaxed",
                "adds visual volume and balances a slim frame",
            )
        } else if bmi < 25.0 {
            (
                "a tailored, true-to-size",
                "follows balanced proportions without pulling or sagging",
            )
        } else {
            (
                "a straight-cut, comfortable",
                "skims the body and creates a clean vertical line",
            )
        };

        Ok(StyleRecommendation {
            recommendation: format!(
                "Go for {} {} in a {} style.",
                fit,
                garment,
                request.style_preferences.to_lowercase()
            ),
            reasoning: format!(
                "At {} cm and {} kg (BMI {:.1}), this cut {}.",
                request.height, request.weight, bmi, why
            ),
        })
    }
}
