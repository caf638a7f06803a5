//! Virtual Tailor collaborator backends
//!
//! The session talks to two external collaborators through the traits in
//! [`plugin`]: an image compositor that renders the user wearing a garment, and
//! a style advisor that writes a recommendation from body measurements.
//! Backends are picked from configuration by [`factory`].

pub mod factory;
pub mod plugin;
pub mod simulated;

#[cfg(feature = "advisor-anthropic")]
pub mod claude_stylist;
#[cfg(feature = "compositor-replicate")]
pub mod replicate_tryon;

pub use factory::{create_compositor, create_style_advisor};
pub use plugin::{Compositor, StyleAdvisor};
pub use simulated::{SimulatedCompositor, SimulatedStyleAdvisor};

#[cfg(feature = "advisor-anthropic")]
pub use claude_stylist::{ClaudeStyleAdvisor, ClaudeStylistConfig};
#[cfg(feature = "compositor-replicate")]
pub use replicate_tryon::{ReplicateTryOnCompositor, ReplicateTryOnConfig};
