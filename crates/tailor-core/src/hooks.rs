//! Hooks for user-facing notifications
//!
//! The session reports short-lived notices (selection confirmations, missing
//! information, processing outcome, downloads) through the `SessionNotifier`
//! trait. A UI implements it to show toasts; headless callers can drop them or
//! route them into the log.

use serde::Serialize;

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSeverity {
    Info,
    Destructive,
}

/// A transient user-facing notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: NotificationSeverity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: NotificationSeverity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: NotificationSeverity::Destructive,
        }
    }

    pub fn image_selected(filename: &str) -> Self {
        Self::info(
            "Image Selected",
            format!("{} is ready for preview.", filename),
        )
    }

    pub fn invalid_file_type() -> Self {
        Self::destructive("Invalid File Type", "Please upload an image file.")
    }

    pub fn invalid_image(description: impl Into<String>) -> Self {
        Self::destructive("Invalid Image", description)
    }

    pub fn body_details_saved() -> Self {
        Self::info(
            "Body Details Saved",
            "Your height and weight have been recorded.",
        )
    }

    pub fn missing_information(description: impl Into<String>) -> Self {
        Self::destructive("Missing Information", description)
    }

    pub fn missing_body_details(description: impl Into<String>) -> Self {
        Self::destructive("Missing Body Details", description)
    }

    pub fn try_on_ready() -> Self {
        Self::info(
            "Success!",
            "Your virtual try-on is ready and we have a recommendation for you.",
        )
    }

    pub fn processing_error() -> Self {
        Self::destructive("Processing Error", "An error occurred. Please try again.")
    }

    pub fn image_downloaded(filename: &str) -> Self {
        Self::info("Image Downloaded", format!("{} has been saved.", filename))
    }

    pub fn nothing_to_download() -> Self {
        Self::destructive("No Image to Download", "Please generate an image first.")
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == NotificationSeverity::Destructive
    }
}

/// Receiver of session notifications
///
/// Called synchronously while the session is not holding its state lock.
pub trait SessionNotifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// No-op implementation for headless use
pub struct NoOpNotifier;

impl SessionNotifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Writes notifications to the tracing log
pub struct TracingNotifier;

impl SessionNotifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            NotificationSeverity::Info => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Session notification"
            ),
            NotificationSeverity::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Session notification"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_severity() {
        assert!(!Notification::image_selected("me.jpg").is_destructive());
        assert!(Notification::invalid_file_type().is_destructive());
        assert!(Notification::processing_error().is_destructive());
        assert!(Notification::nothing_to_download().is_destructive());
    }

    #[test]
    fn test_notification_text() {
        let n = Notification::image_selected("me.jpg");
        assert_eq!(n.title, "Image Selected");
        assert_eq!(n.description, "me.jpg is ready for preview.");

        let n = Notification::image_downloaded("42.jpg");
        assert_eq!(n.description, "42.jpg has been saved.");
    }

    #[test]
    fn test_notification_serializes_lowercase_severity() {
        let json = serde_json::to_value(Notification::try_on_ready()).unwrap();
        assert_eq!(json["severity"], "info");
        assert_eq!(json["title"], "Success!");
    }

    #[test]
    fn test_builtin_notifiers_accept_notifications() {
        NoOpNotifier.notify(Notification::body_details_saved());
        TracingNotifier.notify(Notification::processing_error());
    }
}
