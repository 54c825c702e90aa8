use serde::{Deserialize, Serialize};

/// One entry under a user-defined category. `rating` is a digit-only string,
/// validated at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub name: String,
    pub rating: String,
}

/// The serialized wrapper document persisted under each `{category}_Items` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemList {
    pub items: Vec<CategoryItem>,
}

/// A category with its items, as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<CategoryItem>,
}
