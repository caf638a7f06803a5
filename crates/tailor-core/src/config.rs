//! Configuration module
//!
//! Runtime configuration for a try-on session and its collaborator backends, read
//! from the environment (and an optional `.env` file).

use std::env;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;

const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_IMAGE_SIZE_MB_LIMIT: usize = 1024;
const SIMULATED_DELAY_MS: u64 = 2000;
const REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";
const REPLICATE_TRYON_MODEL: &str = "cuuupid/idm-vton";
const REPLICATE_POLL_INTERVAL_MS: u64 = 1000;
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;
const COLLABORATOR_TIMEOUT_SECS: u64 = 300;

/// Image compositor backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositorBackend {
    Simulated,
    Replicate,
}

impl FromStr for CompositorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulated" => Ok(CompositorBackend::Simulated),
            "replicate" => Ok(CompositorBackend::Replicate),
            _ => Err(anyhow::anyhow!("Invalid compositor backend: {}", s)),
        }
    }
}

impl Display for CompositorBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CompositorBackend::Simulated => write!(f, "simulated"),
            CompositorBackend::Replicate => write!(f, "replicate"),
        }
    }
}

/// Style advisor (text generator) backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorBackend {
    Simulated,
    Anthropic,
}

impl FromStr for AdvisorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulated" => Ok(AdvisorBackend::Simulated),
            "anthropic" | "claude" => Ok(AdvisorBackend::Anthropic),
            _ => Err(anyhow::anyhow!("Invalid style advisor backend: {}", s)),
        }
    }
}

impl Display for AdvisorBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AdvisorBackend::Simulated => write!(f, "simulated"),
            AdvisorBackend::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// How the two collaborator calls of a submission are dispatched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchPolicy {
    /// Composite first; the recommendation is only requested after it succeeds
    #[default]
    Sequential,
    /// Both calls run concurrently and are joined
    Concurrent,
}

impl FromStr for DispatchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(DispatchPolicy::Sequential),
            "concurrent" => Ok(DispatchPolicy::Concurrent),
            _ => Err(anyhow::anyhow!("Invalid dispatch policy: {}", s)),
        }
    }
}

impl Display for DispatchPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DispatchPolicy::Sequential => write!(f, "sequential"),
            DispatchPolicy::Concurrent => write!(f, "concurrent"),
        }
    }
}

/// Virtual Tailor configuration
#[derive(Clone)]
pub struct TailorConfig {
    pub environment: String,
    /// Identifier sent to the compositor; a random one is generated per session when unset
    pub user_id: Option<String>,
    pub max_image_size_mb: usize,
    pub dispatch_policy: DispatchPolicy,
    pub catalog_path: Option<PathBuf>,
    pub collaborator_timeout_secs: u64,
    // Compositor
    pub compositor_backend: CompositorBackend,
    pub simulated_delay_ms: u64,
    pub replicate_api_token: Option<String>,
    pub replicate_model_version: String,
    pub replicate_api_base: String,
    pub replicate_poll_interval_ms: u64,
    // Style advisor
    pub advisor_backend: AdvisorBackend,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub anthropic_api_base: String,
}

impl Default for TailorConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            user_id: None,
            max_image_size_mb: MAX_IMAGE_SIZE_MB,
            dispatch_policy: DispatchPolicy::Sequential,
            catalog_path: None,
            collaborator_timeout_secs: COLLABORATOR_TIMEOUT_SECS,
            compositor_backend: CompositorBackend::Simulated,
            simulated_delay_ms: SIMULATED_DELAY_MS,
            replicate_api_token: None,
            replicate_model_version: REPLICATE_TRYON_MODEL.to_string(),
            replicate_api_base: REPLICATE_API_BASE.to_string(),
            replicate_poll_interval_ms: REPLICATE_POLL_INTERVAL_MS,
            advisor_backend: AdvisorBackend::Anthropic,
            anthropic_api_key: None,
            anthropic_model: ANTHROPIC_MODEL.to_string(),
            anthropic_max_tokens: ANTHROPIC_MAX_TOKENS,
            anthropic_api_base: ANTHROPIC_API_BASE.to_string(),
        }
    }
}

// Secrets are redacted
impl Debug for TailorConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TailorConfig")
            .field("environment", &self.environment)
            .field("user_id", &self.user_id)
            .field("max_image_size_mb", &self.max_image_size_mb)
            .field("dispatch_policy", &self.dispatch_policy)
            .field("catalog_path", &self.catalog_path)
            .field("collaborator_timeout_secs", &self.collaborator_timeout_secs)
            .field("compositor_backend", &self.compositor_backend)
            .field("simulated_delay_ms", &self.simulated_delay_ms)
            .field(
                "replicate_api_token",
                &self.replicate_api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("replicate_model_version", &self.replicate_model_version)
            .field("replicate_api_base", &self.replicate_api_base)
            .field("replicate_poll_interval_ms", &self.replicate_poll_interval_ms)
            .field("advisor_backend", &self.advisor_backend)
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_max_tokens", &self.anthropic_max_tokens)
            .field("anthropic_api_base", &self.anthropic_api_base)
            .finish()
    }
}

impl TailorConfig {
    /// Load configuration from the process environment and `.env`
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load an explicit env file into the process environment, then read configuration.
    /// Variables already set in the environment take precedence over the file.
    pub fn from_env_file(path: &Path) -> Result<Self, anyhow::Error> {
        dotenvy::from_path(path)
            .with_context(|| format!("Failed to load env file: {}", path.display()))?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let max_image_size_mb = match var("MAX_IMAGE_SIZE_MB") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_IMAGE_SIZE_MB must be a valid number"))?,
            None => MAX_IMAGE_SIZE_MB,
        };

        let compositor_backend = var("COMPOSITOR_BACKEND")
            .map(|v| v.parse::<CompositorBackend>())
            .transpose()?
            .unwrap_or(CompositorBackend::Simulated);

        let advisor_backend = var("STYLE_ADVISOR_BACKEND")
            .map(|v| v.parse::<AdvisorBackend>())
            .transpose()?
            .unwrap_or(AdvisorBackend::Anthropic);

        let dispatch_policy = var("DISPATCH_POLICY")
            .map(|v| v.parse::<DispatchPolicy>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            environment,
            user_id: var("TAILOR_USER_ID"),
            max_image_size_mb,
            dispatch_policy,
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            collaborator_timeout_secs: var("COLLABORATOR_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(COLLABORATOR_TIMEOUT_SECS),
            compositor_backend,
            simulated_delay_ms: var("COMPOSITOR_SIMULATED_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(SIMULATED_DELAY_MS),
            replicate_api_token: var("REPLICATE_API_TOKEN"),
            replicate_model_version: var("REPLICATE_MODEL_VERSION")
                .unwrap_or_else(|| REPLICATE_TRYON_MODEL.to_string()),
            replicate_api_base: var("REPLICATE_API_BASE")
                .unwrap_or_else(|| REPLICATE_API_BASE.to_string()),
            replicate_poll_interval_ms: var("REPLICATE_POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(REPLICATE_POLL_INTERVAL_MS),
            advisor_backend,
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            anthropic_model: var("ANTHROPIC_MODEL").unwrap_or_else(|| ANTHROPIC_MODEL.to_string()),
            anthropic_max_tokens: var("ANTHROPIC_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(ANTHROPIC_MAX_TOKENS),
            anthropic_api_base: var("ANTHROPIC_API_BASE")
                .unwrap_or_else(|| ANTHROPIC_API_BASE.to_string()),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_image_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_SIZE_MB must be greater than 0"));
        }

        if self.max_image_size_mb > MAX_IMAGE_SIZE_MB_LIMIT {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_SIZE_MB must be at most {}",
                MAX_IMAGE_SIZE_MB_LIMIT
            ));
        }

        if self.collaborator_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "COLLABORATOR_TIMEOUT_SECS must be greater than 0"
            ));
        }

        match self.compositor_backend {
            CompositorBackend::Replicate => {
                if self.replicate_api_token.is_none() {
                    return Err(anyhow::anyhow!(
                        "REPLICATE_API_TOKEN must be set when using the replicate compositor backend"
                    ));
                }
                if self.replicate_model_version.trim().is_empty() {
                    return Err(anyhow::anyhow!("REPLICATE_MODEL_VERSION must not be empty"));
                }
            }
            CompositorBackend::Simulated => {}
        }

        match self.advisor_backend {
            AdvisorBackend::Anthropic => {
                if self.anthropic_api_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "ANTHROPIC_API_KEY must be set when using the anthropic style advisor"
                    ));
                }
                if self.anthropic_max_tokens == 0 {
                    return Err(anyhow::anyhow!(
                        "ANTHROPIC_MAX_TOKENS must be greater than 0"
                    ));
                }
            }
            AdvisorBackend::Simulated => {}
        }

        if let Some(path) = &self.catalog_path {
            if !path.is_file() {
                return Err(anyhow::anyhow!(
                    "CATALOG_PATH does not point to a readable file: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }

    /// Upload limit in bytes; saturates for limits `validate()` would reject
    pub fn max_image_size_bytes(&self) -> usize {
        self.max_image_size_mb.saturating_mul(1024 * 1024)
    }
}
