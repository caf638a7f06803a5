//! Virtual Tailor Services Layer
//!
//! Hosts the try-on session controller: input capture, the completeness gate,
//! the submission orchestrator that drives the compositor and style advisor,
//! and the projection of its state for display and download.

pub mod download;
pub mod session;

pub use download::ResultDownloader;
pub use session::presentation::{derive_download_filename, DownloadRequest, ResultView};
pub use session::{SessionState, TryOnSession, TryOnSessionBuilder};
pub use tailor_plugins::{create_compositor, create_style_advisor, Compositor, StyleAdvisor};
