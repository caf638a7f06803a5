//! Claude personal stylist using Anthropic's Messages API

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use validator::Validate;

use crate::plugin::StyleAdvisor;
use tailor_core::{RecommendationRequest, StyleRecommendation, TailorConfig};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Claude stylist configuration
#[derive(Clone)]
pub struct ClaudeStylistConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_base: String,
    pub timeout: Duration,
}

impl ClaudeStylistConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(config: &TailorConfig) -> Result<Self> {
        let api_key = config
            .anthropic_api_key
            .clone()
            .context("ANTHROPIC_API_KEY is not configured")?;

        Ok(Self {
            api_key,
            model: config.anthropic_model.clone(),
            max_tokens: config.anthropic_max_tokens,
            api_base: config.anthropic_api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.collaborator_timeout_secs),
        })
    }
}

impl Debug for ClaudeStylistConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClaudeStylistConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Style advisor backed by Claude
pub struct ClaudeStyleAdvisor {
    http_client: reqwest::Client,
    config: ClaudeStylistConfig,
}

impl Debug for ClaudeStyleAdvisor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClaudeStyleAdvisor")
            .field("model", &self.config.model)
            .finish()
    }
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl ClaudeStyleAdvisor {
    pub fn new(config: ClaudeStylistConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            anyhow::bail!("Anthropic API key is required but not provided");
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client for Claude stylist")?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn build_prompt(request: &RecommendationRequest) -> String {
        format!(
            "You are a personal stylist AI assistant specializing in providing clothing recommendations based on body structure.

You will use the user's height, weight, desired clothing type, and style preferences to generate a detailed clothing recommendation. The recommendation should include specific details about the clothing item and why it would be a good fit for the user.

Height: {} cm
Weight: {} kg
Desired Clothing: {}
Style Preferences: {}

Consider the user's body structure when making the recommendation. For example, suggest clothing that complements their body shape and proportions.

Explain your reasoning for the recommendation in the reasoning field.

Respond only with a JSON object of the form {{\"recommendation\": \"...\", \"reasoning\": \"...\"}}.",
            request.height, request.weight, request.desired_clothing, request.style_preferences
        )
    }

    async fn send_prompt(&self, prompt: String) -> Result<(String, Option<AnthropicUsage>)> {
        let body = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(format!(
                "{}/messages",
                self.config.api_base.trim_end_matches('/')
            ))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Claude API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Claude API request failed: {} - {}",
                status,
                error_text
            ));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Claude API response")?;

        let text = parsed
            .content
            .into_iter()
            .find_map(|b| match b {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .unwrap_or_default();

        Ok((text, parsed.usage))
    }

    /// Parse Claude's reply into a recommendation
    fn parse_recommendation(text: &str) -> Result<StyleRecommendation> {
        // Try to extract JSON from markdown code blocks if present
        let json_text = if text.contains("```json") {
            text.split("```json")
                .nth(1)
                .and_then(|s| s.split("```").next())
                .unwrap_or(text)
                .trim()
        } else if text.contains("```") {
            text.split("```")
                .nth(1)
                .and_then(|s| s.split("```").next())
                .unwrap_or(text)
                .trim()
        } else {
            text.trim()
        };

        let recommendation: StyleRecommendation = serde_json::from_str(json_text)
            .context("Failed to parse Claude recommendation as JSON")?;

        recommendation
            .validate()
            .context("Claude returned an incomplete recommendation")?;

        Ok(recommendation)
    }
}

#[async_trait]
impl StyleAdvisor for ClaudeStyleAdvisor {
    fn name(&self) -> &str {
        "claude_stylist"
    }

    async fn recommend(&self, request: RecommendationRequest) -> Result<StyleRecommendation> {
        request
            .validate()
            .context("Invalid recommendation request")?;

        tracing::info!(
            model = %self.config.model,
            desired_clothing = %request.desired_clothing,
            "Requesting style recommendation from Claude"
        );

        let (text, usage) = self.send_prompt(Self::build_prompt(&request)).await?;
        let recommendation = Self::parse_recommendation(&text)?;

        if let Some(usage) = usage {
            tracing::info!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Claude style recommendation completed"
            );
        }

        Ok(recommendation)
    }
}
