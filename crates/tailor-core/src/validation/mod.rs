//! Validation modules
//!
//! Everything here runs at the capture boundary: rejected input is reported with
//! a specific message and never reaches session state.

pub mod image;
pub mod measurement;

pub use image::{detect_media_type, ImageValidator, ValidationError};
pub use measurement::{
    parse_body_details, MeasurementError, MeasurementErrorKind, MeasurementField, MAX_HEIGHT_CM,
    MAX_WEIGHT_KG,
};
