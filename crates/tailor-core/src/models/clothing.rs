use serde::{Deserialize, Serialize};

/// A garment from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: String,
    pub name: String,
    /// Category tag, e.g. "Tops"
    pub category: String,
    /// Reference to the garment image (usually a URL)
    pub image: String,
    /// Hint passed to image models describing the garment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ai_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl ClothingItem {
    /// Description of the garment for image models; falls back to the category
    pub fn garment_description(&self) -> String {
        self.data_ai_hint
            .clone()
            .unwrap_or_else(|| self.category.to_lowercase())
    }
}
