//! Replicate virtual try-on compositor
//!
//! Runs an IDM-VTON style model on Replicate: the user's photo goes in as a
//! `data:` URI, the garment as a URL, and the output is a single image URL.
//! Model: https://replicate.com/cuuupid/idm-vton

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tokio::time::sleep;

use crate::plugin::Compositor;
use tailor_core::{CompositeRequest, CompositeResponse, TailorConfig};

const DEFAULT_API_BASE: &str = "https://api.replicate.com/v1";
const DEFAULT_MODEL: &str = "cuuupid/idm-vton";
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 300;

/// Replicate try-on configuration
#[derive(Clone)]
pub struct ReplicateTryOnConfig {
    pub api_token: String,
    /// `owner/model`, `owner/model:version` or a bare version id
    pub model_version: String,
    pub api_base: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub timeout: Duration,
}

impl ReplicateTryOnConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            model_version: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            timeout: Duration::from_secs(300),
        }
    }

    pub fn from_config(config: &TailorConfig) -> Result<Self> {
        let api_token = config
            .replicate_api_token
            .clone()
            .context("REPLICATE_API_TOKEN is not configured")?;

        Ok(Self {
            api_token,
            model_version: config.replicate_model_version.clone(),
            api_base: config.replicate_api_base.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.replicate_poll_interval_ms),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            timeout: Duration::from_secs(config.collaborator_timeout_secs),
        })
    }
}

impl Debug for ReplicateTryOnConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ReplicateTryOnConfig")
            .field("model_version", &self.model_version)
            .field("api_base", &self.api_base)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .finish()
    }
}

/// Replicate try-on compositor
pub struct ReplicateTryOnCompositor {
    http_client: reqwest::Client,
    config: ReplicateTryOnConfig,
}

impl Debug for ReplicateTryOnCompositor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ReplicateTryOnCompositor")
            .field("model_version", &self.config.model_version)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    id: String,
    status: String,
    output: Option<serde_json::Value>,
    error: Option<String>,
}

/// Map a catalog category onto the model's garment category
fn garment_category(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "pants" | "trousers" | "skirts" | "shorts" | "bottoms" => "lower_body",
        "dresses" | "gowns" => "dresses",
        _ => "upper_body",
    }
}

impl ReplicateTryOnCompositor {
    pub fn new(config: ReplicateTryOnConfig) -> Result<Self> {
        if config.api_token.trim().is_empty() {
            anyhow::bail!("Replicate API token is required but not provided");
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client for Replicate try-on")?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Endpoint and body for creating a prediction.
    ///
    /// Model slugs without a version go through the model predictions endpoint;
    /// anything with a version id goes through `/predictions`.
    fn prediction_target(&self, input: serde_json::Value) -> (String, serde_json::Value) {
        let base = self.config.api_base.trim_end_matches('/');
        match self.config.model_version.split_once(':') {
            Some((_, version)) => (
                format!("{}/predictions", base),
                json!({ "version": version, "input": input }),
            ),
            None if self.config.model_version.contains('/') => (
                format!("{}/models/{}/predictions", base, self.config.model_version),
                json!({ "input": input }),
            ),
            None => (
                format!("{}/predictions", base),
                json!({ "version": self.config.model_version, "input": input }),
            ),
        }
    }

    async fn create_prediction(&self, request: &CompositeRequest) -> Result<PredictionResponse> {
        let input = json!({
            "human_img": request.user_image.preview(),
            "garm_img": request.garment_image,
            "garment_des": request.garment_description,
            "category": garment_category(&request.garment_category),
        });
        let (url, body) = self.prediction_target(input);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Token {}", self.config.api_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Replicate API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Replicate API request failed: {} - {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse Replicate API response")
    }

    async fn get_prediction(&self, prediction_id: &str) -> Result<PredictionResponse> {
        let url = format!(
            "{}/predictions/{}",
            self.config.api_base.trim_end_matches('/'),
            prediction_id
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Token {}", self.config.api_token))
            .send()
            .await
            .context("Failed to get prediction status from Replicate API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Failed to get prediction status: {} - {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse prediction response")
    }

    async fn wait_for_prediction(&self, created: PredictionResponse) -> Result<PredictionResponse> {
        let prediction_id = created.id.clone();
        let mut prediction = created;

        for attempt in 0..self.config.max_poll_attempts {
            match prediction.status.as_str() {
                "succeeded" => {
                    tracing::info!(
                        prediction_id = %prediction_id,
                        attempts = attempt + 1,
                        "Replicate prediction completed successfully"
                    );
                    return Ok(prediction);
                }
                "failed" => {
                    let error_msg = prediction
                        .error
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Err(anyhow::anyhow!(
                        "Replicate prediction failed: {}",
                        error_msg
                    ));
                }
                "canceled" => {
                    return Err(anyhow::anyhow!("Replicate prediction was canceled"));
                }
                "starting" | "processing" => {
                    tracing::debug!(
                        prediction_id = %prediction_id,
                        attempt = attempt + 1,
                        status = %prediction.status,
                        "Waiting for Replicate prediction to complete"
                    );
                }
                _ => {
                    tracing::warn!(
                        prediction_id = %prediction_id,
                        status = %prediction.status,
                        "Unknown prediction status"
                    );
                }
            }

            sleep(self.config.poll_interval).await;
            prediction = self.get_prediction(&prediction_id).await?;
        }

        Err(anyhow::anyhow!(
            "Replicate prediction timed out after {} attempts",
            self.config.max_poll_attempts
        ))
    }

    /// The model returns either a single URL or a list of URLs
    fn extract_output_url(output: Option<serde_json::Value>) -> Result<String> {
        let url = match output {
            Some(serde_json::Value::String(url)) => Some(url),
            Some(serde_json::Value::Array(items)) => items.into_iter().find_map(|item| match item {
                serde_json::Value::String(url) => Some(url),
                _ => None,
            }),
            _ => None,
        };

        url.filter(|u| !u.trim().is_empty())
            .context("Replicate prediction returned no output image")
    }
}

#[async_trait]
impl Compositor for ReplicateTryOnCompositor {
    fn name(&self) -> &str {
        "replicate_tryon"
    }

    async fn composite(&self, request: CompositeRequest) -> Result<CompositeResponse> {
        tracing::info!(
            session_id = %request.session_id,
            garment_image = %request.garment_image,
            image_size = request.user_image.size(),
            "Executing Replicate try-on"
        );

        let created = self.create_prediction(&request).await?;
        let prediction = self.wait_for_prediction(created).await?;
        let image_url = Self::extract_output_url(prediction.output)?;

        Ok(CompositeResponse { image_url })
    }
}
