//! Durable storage of the own-drink catalogue.
//!
//! The whole catalogue lives as one JSON document under the `Drinks` key;
//! every mutation is a read-modify-write of the full blob. Mutations all
//! arrive through the form's single lock, so there is exactly one logical
//! writer. A blob that fails to parse loads as an empty catalogue; the
//! corrupt value is left in place until the next successful save
//! overwrites it.

use crate::prefs::Prefs;
use common::model::drink::{Catalogue, DrinkRecord};
use log::warn;

pub const DRINKS_KEY: &str = "Drinks";

pub fn load(prefs: &Prefs) -> Vec<DrinkRecord> {
    match prefs.get_string(DRINKS_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<Catalogue>(&json) {
            Ok(catalogue) => catalogue.drinks,
            Err(e) => {
                warn!("Persisted catalogue is unreadable, treating as empty: {}", e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not read the drink catalogue: {}", e);
            Vec::new()
        }
    }
}

pub fn persist(prefs: &Prefs, drinks: Vec<DrinkRecord>) -> Result<(), String> {
    let json = serde_json::to_string(&Catalogue { drinks }).map_err(|e| e.to_string())?;
    prefs.set_string(DRINKS_KEY, &json)
}

/// Appends one record and rewrites the catalogue. Names are kept unique
/// here so that removal by name stays deterministic.
pub fn append(prefs: &Prefs, record: DrinkRecord) -> Result<(), String> {
    let mut drinks = load(prefs);
    if drinks.iter().any(|d| d.name == record.name) {
        return Err("A drink with this name already exists.".to_string());
    }
    drinks.push(record);
    persist(prefs, drinks)
}

/// Removes the first record with the given name and rewrites the
/// catalogue. Returns the removed record so the caller can release its
/// image file.
pub fn remove_by_name(prefs: &Prefs, name: &str) -> Result<Option<DrinkRecord>, String> {
    let mut drinks = load(prefs);
    match drinks.iter().position(|d| d.name == name) {
        Some(index) => {
            let removed = drinks.remove(index);
            persist(prefs, drinks)?;
            Ok(Some(removed))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::drink::Ingredient;

    fn temp_prefs() -> (tempfile::TempDir, Prefs) {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Prefs::open(dir.path()).unwrap();
        (dir, prefs)
    }

    fn record(name: &str) -> DrinkRecord {
        DrinkRecord {
            name: name.to_string(),
            image_ref: format!("{}.png", name.to_lowercase()),
            ingredients: vec![Ingredient {
                name: "Rum".to_string(),
                measure: "50ml".to_string(),
            }],
            instructions: "Mix and serve".to_string(),
        }
    }

    #[test]
    fn missing_key_loads_as_empty() {
        let (_dir, prefs) = temp_prefs();
        assert!(load(&prefs).is_empty());
    }

    #[test]
    fn persist_then_load_round_trips() {
        let (_dir, prefs) = temp_prefs();
        let drinks = vec![record("Mojito"), record("Daiquiri")];
        persist(&prefs, drinks.clone()).unwrap();
        assert_eq!(load(&prefs), drinks);

        persist(&prefs, Vec::new()).unwrap();
        assert!(load(&prefs).is_empty());
    }

    #[test]
    fn append_grows_by_exactly_one() {
        let (_dir, prefs) = temp_prefs();
        append(&prefs, record("Mojito")).unwrap();
        append(&prefs, record("Daiquiri")).unwrap();
        let drinks = load(&prefs);
        assert_eq!(drinks.len(), 2);
        assert_eq!(drinks[1], record("Daiquiri"));
    }

    #[test]
    fn append_rejects_duplicate_names() {
        let (_dir, prefs) = temp_prefs();
        append(&prefs, record("Mojito")).unwrap();
        let err = append(&prefs, record("Mojito")).unwrap_err();
        assert_eq!(err, "A drink with this name already exists.");
        assert_eq!(load(&prefs).len(), 1);
    }

    #[test]
    fn remove_by_name_removes_the_first_match_only() {
        let (_dir, prefs) = temp_prefs();
        // Duplicates can only exist in a blob written by older data, so
        // bypass append to set one up.
        let mut first = record("Mojito");
        first.instructions = "first".to_string();
        let mut second = record("Mojito");
        second.instructions = "second".to_string();
        persist(&prefs, vec![first, second]).unwrap();

        let removed = remove_by_name(&prefs, "Mojito").unwrap().unwrap();
        assert_eq!(removed.instructions, "first");
        let rest = load(&prefs);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].instructions, "second");
    }

    #[test]
    fn remove_of_unknown_name_is_a_no_op() {
        let (_dir, prefs) = temp_prefs();
        append(&prefs, record("Mojito")).unwrap();
        assert!(remove_by_name(&prefs, "Negroni").unwrap().is_none());
        assert_eq!(load(&prefs).len(), 1);
    }

    #[test]
    fn corrupt_blob_loads_as_empty_and_is_left_in_place() {
        let (_dir, prefs) = temp_prefs();
        prefs.set_string(DRINKS_KEY, "not json at all").unwrap();
        assert!(load(&prefs).is_empty());
        // The broken value is still there until the next successful save.
        assert_eq!(
            prefs.get_string(DRINKS_KEY).unwrap().as_deref(),
            Some("not json at all")
        );
    }
}
