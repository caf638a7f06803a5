#[cfg(feature = "advisor-anthropic")]
use crate::claude_stylist::{ClaudeStyleAdvisor, ClaudeStylistConfig};
#[cfg(feature = "compositor-replicate")]
use crate::replicate_tryon::{ReplicateTryOnCompositor, ReplicateTryOnConfig};
use crate::{Compositor, SimulatedCompositor, SimulatedStyleAdvisor, StyleAdvisor};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tailor_core::{AdvisorBackend, CompositorBackend, TailorConfig};

/// Create the image compositor based on configuration
pub fn create_compositor(config: &TailorConfig) -> Result<Arc<dyn Compositor>> {
    match config.compositor_backend {
        CompositorBackend::Simulated => Ok(Arc::new(SimulatedCompositor::new(
            Duration::from_millis(config.simulated_delay_ms),
        ))),

        #[cfg(feature = "compositor-replicate")]
        CompositorBackend::Replicate => {
            let compositor =
                ReplicateTryOnCompositor::new(ReplicateTryOnConfig::from_config(config)?)?;
            Ok(Arc::new(compositor))
        }

        #[cfg(not(feature = "compositor-replicate"))]
        CompositorBackend::Replicate => Err(anyhow::anyhow!(
            "Replicate compositor not available (compositor-replicate feature not enabled)"
        )),
    }
}

/// Create the style advisor based on configuration
pub fn create_style_advisor(config: &TailorConfig) -> Result<Arc<dyn StyleAdvisor>> {
    match config.advisor_backend {
        AdvisorBackend::Simulated => Ok(Arc::new(SimulatedStyleAdvisor::default())),

        #[cfg(feature = "advisor-anthropic")]
        AdvisorBackend::Anthropic => {
            let advisor = ClaudeStyleAdvisor::new(ClaudeStylistConfig::from_config(config)?)?;
            Ok(Arc::new(advisor))
        }

        #[cfg(not(feature = "advisor-anthropic"))]
        AdvisorBackend::Anthropic => Err(anyhow::anyhow!(
            "Anthropic style advisor not available (advisor-anthropic feature not enabled)"
        )),
    }
}
