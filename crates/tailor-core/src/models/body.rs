use serde::{Deserialize, Serialize};

/// Body measurements used for the style recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyDetails {
    /// Height in centimeters
    pub height_cm: u32,
    /// Weight in kilograms
    pub weight_kg: u32,
}
