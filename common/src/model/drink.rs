use serde::{Deserialize, Serialize};

/// One ingredient line of a user-authored drink. Both fields are required
/// for a row to count as filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// A drink authored by the user. `name` is the lookup key within the
/// catalogue and is kept unique at append time. `image_ref` is a bare file
/// name inside the photos directory, or the bundled default image reference
/// when no photo was captured. Ingredient order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkRecord {
    pub name: String,
    pub image_ref: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
}

/// The serialized wrapper document persisted under the `Drinks` key.
/// The whole catalogue is rewritten on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub drinks: Vec<DrinkRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mojito() -> DrinkRecord {
        DrinkRecord {
            name: "Mojito".to_string(),
            image_ref: "default_drink.png".to_string(),
            ingredients: vec![
                Ingredient {
                    name: "Rum".to_string(),
                    measure: "50ml".to_string(),
                },
                Ingredient {
                    name: "Mint".to_string(),
                    measure: "10 leaves".to_string(),
                },
            ],
            instructions: "Mix and serve".to_string(),
        }
    }

    #[test]
    fn catalogue_round_trips_through_json() {
        let catalogue = Catalogue {
            drinks: vec![mojito()],
        };
        let json = serde_json::to_string(&catalogue).unwrap();
        let restored: Catalogue = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, catalogue);
    }

    #[test]
    fn empty_catalogue_round_trips() {
        let json = serde_json::to_string(&Catalogue::default()).unwrap();
        let restored: Catalogue = serde_json::from_str(&json).unwrap();
        assert!(restored.drinks.is_empty());
    }
}
