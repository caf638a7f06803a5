//! Clothing catalog
//!
//! The catalog is static data injected into a session. It is loaded once, checked
//! for well-formed entries and never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;

use crate::error::AppError;
use crate::models::ClothingItem;

/// Read-only collection of clothing items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<ClothingItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and blank fields
    pub fn new(items: Vec<ClothingItem>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(AppError::Config("Catalog item with empty id".to_string()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(AppError::Config(format!(
                    "Duplicate catalog item id: {}",
                    item.id
                )));
            }
            if item.name.trim().is_empty()
                || item.category.trim().is_empty()
                || item.image.trim().is_empty()
            {
                return Err(AppError::Config(format!(
                    "Catalog item {} must have a name, category and image",
                    item.id
                )));
            }
        }

        Ok(Self { items })
    }

    /// Parse a JSON array of items
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let items: Vec<ClothingItem> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Invalid catalog JSON: {}", e)))?;
        Self::new(items)
    }

    /// Load a JSON catalog file
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to load catalog file: {}", path.display()))
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        Self {
            items: vec![
                builtin_item(
                    "1",
                    "Classic T-Shirt",
                    "Tops",
                    "tshirt",
                    "tshirt fashion",
                    &["Red", "Blue", "Black"],
                ),
                builtin_item(
                    "2",
                    "Denim Jeans",
                    "Pants",
                    "jeans",
                    "jeans model",
                    &["Blue", "Black"],
                ),
                builtin_item(
                    "3",
                    "Summer Dress",
                    "Dresses",
                    "dress",
                    "dress summer",
                    &["Yellow", "Pink", "White"],
                ),
                builtin_item(
                    "4",
                    "Formal Shirt",
                    "Tops",
                    "formalshirt",
                    "shirt business",
                    &["White", "Light Blue"],
                ),
                builtin_item(
                    "5",
                    "Chino Pants",
                    "Pants",
                    "chinopants",
                    "pants casual",
                    &["Khaki", "Navy"],
                ),
                builtin_item(
                    "6",
                    "Evening Gown",
                    "Dresses",
                    "gown",
                    "gown elegant",
                    &["Black", "Red", "Gold"],
                ),
            ],
        }
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ClothingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, item: &ClothingItem) -> bool {
        self.get(&item.id).is_some_and(|found| found == item)
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Items of one category; "All" returns every item
    pub fn by_category(&self, category: &str) -> Vec<&ClothingItem> {
        if category == "All" {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_item(
    id: &str,
    name: &str,
    category: &str,
    seed: &str,
    hint: &str,
    colors: &[&str],
) -> ClothingItem {
    ClothingItem {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        image: format!("https://picsum.photos/seed/{}/300/400", seed),
        data_ai_hint: Some(hint.to_string()),
        colors: Some(colors.iter().map(|c| c.to_string()).collect()),
    }
}
