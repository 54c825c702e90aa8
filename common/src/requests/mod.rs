use crate::model::camera::Orientation;
use crate::model::drink::Ingredient;
use serde::{Deserialize, Serialize};

/// Payload for the capture endpoints. The orientation defaults to portrait
/// when the caller omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureRequest {
    #[serde(default)]
    pub orientation: Orientation,
}

/// Payload for submitting the own-drink form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitDrinkRequest {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
}

/// Payload for creating a user-defined category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCategoryRequest {
    pub name: String,
}

/// Payload for adding an item to an existing category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCategoryItemRequest {
    pub name: String,
    pub rating: String,
}
