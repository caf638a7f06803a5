//! Virtual Tailor Core Library
//!
//! This crate provides the domain models, error types, configuration, catalog and
//! input validation shared by every Virtual Tailor component.

pub mod catalog;
pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::{AdvisorBackend, CompositorBackend, DispatchPolicy, TailorConfig};
pub use error::{AppError, ErrorMetadata, LogLevel, MissingInput, PROCESSING_ERROR_MESSAGE};
pub use hooks::{
    Notification, NoOpNotifier, NotificationSeverity, SessionNotifier, TracingNotifier,
};
pub use models::{
    BodyDetails, ClothingItem, CompositeRequest, CompositeResponse, ImageSource, ImageUpload,
    RecommendationRequest, StyleRecommendation, SubmissionFailure, SubmissionState, TryOnResult,
    UserImage,
};
pub use validation::{ImageValidator, MeasurementError, MeasurementField, ValidationError};
