use serde::{Deserialize, Serialize};

/// The JSON envelope returned by the remote recipe API. A search with no
/// matches yields `{"drinks": null}`, which deserializes to `None` here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkResponse {
    pub drinks: Option<Vec<RemoteDrink>>,
}

/// One drink object from the remote recipe API.
///
/// The API ships ingredients and measurements as fifteen positional,
/// nullable string fields instead of an array, so the struct mirrors that
/// wire shape verbatim and [`RemoteDrink::ingredient_pairs`] reassembles the
/// ordered list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteDrink {
    #[serde(rename = "idDrink")]
    pub id: Option<String>,
    #[serde(rename = "strDrink")]
    pub name: Option<String>,
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
    #[serde(rename = "strAlcoholic")]
    pub alcoholic: Option<String>,
    #[serde(rename = "strGlass")]
    pub glass: Option<String>,
    #[serde(rename = "strInstructions")]
    pub instructions: Option<String>,
    #[serde(rename = "strDrinkThumb")]
    pub thumb: Option<String>,
    #[serde(rename = "strIngredient1")]
    pub ingredient1: Option<String>,
    #[serde(rename = "strIngredient2")]
    pub ingredient2: Option<String>,
    #[serde(rename = "strIngredient3")]
    pub ingredient3: Option<String>,
    #[serde(rename = "strIngredient4")]
    pub ingredient4: Option<String>,
    #[serde(rename = "strIngredient5")]
    pub ingredient5: Option<String>,
    #[serde(rename = "strIngredient6")]
    pub ingredient6: Option<String>,
    #[serde(rename = "strIngredient7")]
    pub ingredient7: Option<String>,
    #[serde(rename = "strIngredient8")]
    pub ingredient8: Option<String>,
    #[serde(rename = "strIngredient9")]
    pub ingredient9: Option<String>,
    #[serde(rename = "strIngredient10")]
    pub ingredient10: Option<String>,
    #[serde(rename = "strIngredient11")]
    pub ingredient11: Option<String>,
    #[serde(rename = "strIngredient12")]
    pub ingredient12: Option<String>,
    #[serde(rename = "strIngredient13")]
    pub ingredient13: Option<String>,
    #[serde(rename = "strIngredient14")]
    pub ingredient14: Option<String>,
    #[serde(rename = "strIngredient15")]
    pub ingredient15: Option<String>,
    #[serde(rename = "strMeasure1")]
    pub measure1: Option<String>,
    #[serde(rename = "strMeasure2")]
    pub measure2: Option<String>,
    #[serde(rename = "strMeasure3")]
    pub measure3: Option<String>,
    #[serde(rename = "strMeasure4")]
    pub measure4: Option<String>,
    #[serde(rename = "strMeasure5")]
    pub measure5: Option<String>,
    #[serde(rename = "strMeasure6")]
    pub measure6: Option<String>,
    #[serde(rename = "strMeasure7")]
    pub measure7: Option<String>,
    #[serde(rename = "strMeasure8")]
    pub measure8: Option<String>,
    #[serde(rename = "strMeasure9")]
    pub measure9: Option<String>,
    #[serde(rename = "strMeasure10")]
    pub measure10: Option<String>,
    #[serde(rename = "strMeasure11")]
    pub measure11: Option<String>,
    #[serde(rename = "strMeasure12")]
    pub measure12: Option<String>,
    #[serde(rename = "strMeasure13")]
    pub measure13: Option<String>,
    #[serde(rename = "strMeasure14")]
    pub measure14: Option<String>,
    #[serde(rename = "strMeasure15")]
    pub measure15: Option<String>,
}

impl RemoteDrink {
    /// Ordered (ingredient, measurement) pairs. Iteration stops at the first
    /// empty ingredient slot; a filled ingredient with an empty measurement
    /// keeps its position with an empty measure string.
    pub fn ingredient_pairs(&self) -> Vec<(String, String)> {
        let ingredients = [
            &self.ingredient1,
            &self.ingredient2,
            &self.ingredient3,
            &self.ingredient4,
            &self.ingredient5,
            &self.ingredient6,
            &self.ingredient7,
            &self.ingredient8,
            &self.ingredient9,
            &self.ingredient10,
            &self.ingredient11,
            &self.ingredient12,
            &self.ingredient13,
            &self.ingredient14,
            &self.ingredient15,
        ];
        let measures = [
            &self.measure1,
            &self.measure2,
            &self.measure3,
            &self.measure4,
            &self.measure5,
            &self.measure6,
            &self.measure7,
            &self.measure8,
            &self.measure9,
            &self.measure10,
            &self.measure11,
            &self.measure12,
            &self.measure13,
            &self.measure14,
            &self.measure15,
        ];

        let mut pairs = Vec::new();
        for (ingredient, measure) in ingredients.iter().zip(measures.iter()) {
            match ingredient {
                Some(name) if !name.trim().is_empty() => {
                    let measure = measure
                        .as_deref()
                        .map(str::trim)
                        .unwrap_or_default()
                        .to_string();
                    pairs.push((name.trim().to_string(), measure));
                }
                _ => break,
            }
        }
        pairs
    }

    /// Low-resolution variant of the thumbnail URL used by result listings.
    pub fn small_thumb(&self) -> Option<String> {
        self.thumb
            .as_ref()
            .map(|url| url.replace("/preview", "/100x100"))
    }
}

/// Compact row for search result listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkSummary {
    pub id: String,
    pub name: String,
    pub thumb: Option<String>,
}

impl DrinkSummary {
    pub fn of(drink: &RemoteDrink) -> DrinkSummary {
        DrinkSummary {
            id: drink.id.clone().unwrap_or_default(),
            name: drink.name.clone().unwrap_or_default(),
            thumb: drink.small_thumb(),
        }
    }
}

/// The serialized wrapper document persisted under the `FavoriteDrinks` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FavoritesList {
    pub drinks: Vec<RemoteDrink>,
}
