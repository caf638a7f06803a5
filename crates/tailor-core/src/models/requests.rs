//! Collaborator request/response contracts

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{BodyDetails, ClothingItem, UserImage};
use crate::validation::{MAX_HEIGHT_CM, MAX_WEIGHT_KG};

/// Input to the image compositor
#[derive(Debug, Clone)]
pub struct CompositeRequest {
    pub user_image: UserImage,
    /// Reference to the garment image
    pub garment_image: String,
    /// Garment description for models that take one
    pub garment_description: String,
    /// Catalog category of the garment
    pub garment_category: String,
    /// Session/user identifier
    pub session_id: String,
}

impl CompositeRequest {
    pub fn new(user_image: UserImage, clothing: &ClothingItem, session_id: impl Into<String>) -> Self {
        Self {
            user_image,
            garment_image: clothing.image.clone(),
            garment_description: clothing.garment_description(),
            garment_category: clothing.category.clone(),
            session_id: session_id.into(),
        }
    }
}

/// Output of the image compositor: exactly one image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResponse {
    pub image_url: String,
}

/// Input to the style recommendation text generator.
///
/// Validated before dispatch so malformed input never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Height in centimeters
    #[validate(range(min = 1, max = MAX_HEIGHT_CM))]
    pub height: u32,
    /// Weight in kilograms
    #[validate(range(min = 1, max = MAX_WEIGHT_KG))]
    pub weight: u32,
    #[validate(custom(function = "validate_not_blank"))]
    pub desired_clothing: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub style_preferences: String,
}

impl RecommendationRequest {
    /// Build the request from the session inputs. The garment category stands in
    /// for the user's style preference.
    pub fn new(body: BodyDetails, clothing: &ClothingItem) -> Self {
        Self {
            height: body.height_cm,
            weight: body.weight_kg,
            desired_clothing: clothing.name.clone(),
            style_preferences: clothing.category.clone(),
        }
    }
}

/// Output of the text generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StyleRecommendation {
    #[validate(custom(function = "validate_not_blank"))]
    pub recommendation: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub reasoning: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
