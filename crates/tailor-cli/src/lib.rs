use std::path::Path;

use anyhow::Context;
use tailor_core::{
    validation::image::media_type_from_extension, AppError, ErrorMetadata, ImageSource,
    ImageUpload, Notification, NotificationSeverity, SessionNotifier,
};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Read an image file into an upload. The media type is guessed from the
/// extension; unknown extensions are left for content sniffing.
pub fn load_upload(path: &Path, camera: bool) -> anyhow::Result<ImageUpload> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let content_type = media_type_from_extension(&filename).map(str::to_string);
    let source = if camera {
        ImageSource::Camera
    } else {
        ImageSource::FilePicker
    };

    Ok(ImageUpload::new(source, filename, content_type, data))
}

/// Wrap a session error so the user-facing message is printed first
pub fn user_error(err: AppError) -> anyhow::Error {
    let message = err.client_message();
    anyhow::Error::new(err).context(message)
}

/// Prints session notifications to stderr
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn format(notification: &Notification) -> String {
        let marker = match notification.severity {
            NotificationSeverity::Info => "✓",
            NotificationSeverity::Destructive => "✗",
        };
        format!(
            "{} {}: {}",
            marker,
            notification.title,
            truncate_string(&notification.description, 120)
        )
    }
}

impl SessionNotifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", Self::format(&notification));
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
