use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::OnceLock;

use regex::Regex;

use crate::models::BodyDetails;

/// Upper bound accepted for height, in centimeters
pub const MAX_HEIGHT_CM: u32 = 300;
/// Upper bound accepted for weight, in kilograms
pub const MAX_WEIGHT_KG: u32 = 500;

fn digits_only() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^[0-9]+$").expect("digits pattern is valid"))
}

/// Which measurement field failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Height,
    Weight,
}

impl Display for MeasurementField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MeasurementField::Height => write!(f, "Height"),
            MeasurementField::Weight => write!(f, "Weight"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementErrorKind {
    Required,
    NotANumber,
    OutOfRange { min: u32, max: u32 },
}

/// Field-level measurement error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.field, .kind))]
pub struct MeasurementError {
    pub field: MeasurementField,
    pub kind: MeasurementErrorKind,
}

impl MeasurementError {
    pub fn required(field: MeasurementField) -> Self {
        Self {
            field,
            kind: MeasurementErrorKind::Required,
        }
    }

    pub fn not_a_number(field: MeasurementField) -> Self {
        Self {
            field,
            kind: MeasurementErrorKind::NotANumber,
        }
    }

    /// Message shown next to the offending form field
    pub fn message(&self) -> String {
        describe(&self.field, &self.kind)
    }
}

fn describe(field: &MeasurementField, kind: &MeasurementErrorKind) -> String {
    match kind {
        MeasurementErrorKind::Required => format!("{} is required", field),
        MeasurementErrorKind::NotANumber => format!("{} must be a number", field),
        MeasurementErrorKind::OutOfRange { min, max } => {
            format!("{} must be between {} and {}", field, min, max)
        }
    }
}

fn parse_field(field: MeasurementField, text: &str, max: u32) -> Result<u32, MeasurementError> {
    if text.is_empty() {
        return Err(MeasurementError::required(field));
    }

    if !digits_only().is_match(text) {
        return Err(MeasurementError::not_a_number(field));
    }

    let out_of_range = MeasurementError {
        field,
        kind: MeasurementErrorKind::OutOfRange { min: 1, max },
    };

    // All digits, so the only parse failure left is overflow.
    let value: u32 = text.parse().map_err(|_| out_of_range.clone())?;
    if value == 0 || value > max {
        return Err(out_of_range);
    }

    Ok(value)
}

/// Validate the raw form text and build `BodyDetails`.
///
/// Height is checked first so the reported error matches form order.
pub fn parse_body_details(
    height_text: &str,
    weight_text: &str,
) -> Result<BodyDetails, MeasurementError> {
    let height_cm = parse_field(MeasurementField::Height, height_text, MAX_HEIGHT_CM)?;
    let weight_kg = parse_field(MeasurementField::Weight, weight_text, MAX_WEIGHT_KG)?;

    Ok(BodyDetails {
        height_cm,
        weight_kg,
    })
}
