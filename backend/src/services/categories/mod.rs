//! # Categories Service Module
//!
//! User-defined categories with rated items, under `/api/categories`.
//! Persistence mirrors the two-format layout of the stored data: the
//! category names live comma-joined under the `Categories` key, and each
//! category's items live as a JSON document under their own
//! `{category}_Items` key.
//!
//! ## Registered Routes:
//!
//! *   **`GET /`**: All categories with their items.
//! *   **`POST /`**: Creates a category (non-empty, unique).
//! *   **`POST /{name}/items`**: Adds a `{ name, rating }` item to an
//!     existing category; the rating must be a whole number.

use crate::prefs::Prefs;
use actix_web::web::{self, get, post, scope};
use actix_web::{HttpResponse, Responder, Scope};
use common::model::category::{Category, CategoryItem, ItemList};
use common::requests::{AddCategoryItemRequest, AddCategoryRequest};
use log::warn;

const API_PATH: &str = "/api/categories";
const CATEGORIES_KEY: &str = "Categories";

/// Configures and returns the Actix scope for category routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list))
        .route("", post().to(add))
        .route("/{name}/items", post().to(add_item))
}

async fn list(prefs: web::Data<Prefs>) -> impl Responder {
    let categories: Vec<Category> = load_names(&prefs)
        .into_iter()
        .map(|name| {
            let items = load_items(&prefs, &name);
            Category { name, items }
        })
        .collect();
    HttpResponse::Ok().json(categories)
}

async fn add(prefs: web::Data<Prefs>, payload: web::Json<AddCategoryRequest>) -> impl Responder {
    match add_category(&prefs, &payload.name) {
        Ok(()) => HttpResponse::Ok().body(format!("Category added: {}", payload.name)),
        Err(e) => HttpResponse::BadRequest().body(e),
    }
}

async fn add_item(
    name: web::Path<String>,
    prefs: web::Data<Prefs>,
    payload: web::Json<AddCategoryItemRequest>,
) -> impl Responder {
    let item = CategoryItem {
        name: payload.name.clone(),
        rating: payload.rating.clone(),
    };
    match add_category_item(&prefs, &name, item) {
        Ok(()) => HttpResponse::Ok().body(format!("Item added to {}", name)),
        Err(e) => HttpResponse::BadRequest().body(e),
    }
}

fn items_key(category: &str) -> String {
    format!("{}_Items", category)
}

pub fn load_names(prefs: &Prefs) -> Vec<String> {
    match prefs.get_string(CATEGORIES_KEY) {
        Ok(Some(joined)) if !joined.is_empty() => {
            joined.split(',').map(str::to_string).collect()
        }
        Ok(_) => Vec::new(),
        Err(e) => {
            warn!("Could not read categories: {}", e);
            Vec::new()
        }
    }
}

fn save_names(prefs: &Prefs, names: &[String]) -> Result<(), String> {
    prefs.set_string(CATEGORIES_KEY, &names.join(","))
}

pub fn load_items(prefs: &Prefs, category: &str) -> Vec<CategoryItem> {
    match prefs.get_string(&items_key(category)) {
        Ok(Some(json)) => match serde_json::from_str::<ItemList>(&json) {
            Ok(list) => list.items,
            Err(e) => {
                warn!("Items for category {} are unreadable: {}", category, e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not read items for category {}: {}", category, e);
            Vec::new()
        }
    }
}

fn save_items(prefs: &Prefs, category: &str, items: Vec<CategoryItem>) -> Result<(), String> {
    let json = serde_json::to_string(&ItemList { items }).map_err(|e| e.to_string())?;
    prefs.set_string(&items_key(category), &json)
}

pub fn add_category(prefs: &Prefs, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Category name cannot be empty.".to_string());
    }
    // The name list is stored comma-joined, so commas would split the
    // category on the next load.
    if name.contains(',') {
        return Err("Category names cannot contain commas.".to_string());
    }
    let mut names = load_names(prefs);
    if names.iter().any(|existing| existing == name) {
        return Err("Category already exists.".to_string());
    }
    names.push(name.to_string());
    save_names(prefs, &names)?;
    save_items(prefs, name, Vec::new())
}

pub fn add_category_item(prefs: &Prefs, category: &str, item: CategoryItem) -> Result<(), String> {
    if !load_names(prefs).iter().any(|existing| existing == category) {
        return Err("Category not found.".to_string());
    }
    if item.name.trim().is_empty() {
        return Err("Item name cannot be empty.".to_string());
    }
    if item.rating.is_empty() || !item.rating.chars().all(|c| c.is_ascii_digit()) {
        return Err("Rating must be a whole number.".to_string());
    }
    let mut items = load_items(prefs, category);
    items.push(item);
    save_items(prefs, category, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_prefs() -> (tempfile::TempDir, Prefs) {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Prefs::open(dir.path()).unwrap();
        (dir, prefs)
    }

    fn item(name: &str, rating: &str) -> CategoryItem {
        CategoryItem {
            name: name.to_string(),
            rating: rating.to_string(),
        }
    }

    #[test]
    fn categories_round_trip_in_insertion_order() {
        let (_dir, prefs) = temp_prefs();
        add_category(&prefs, "Sours").unwrap();
        add_category(&prefs, "Tiki").unwrap();
        assert_eq!(load_names(&prefs), vec!["Sours", "Tiki"]);
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let (_dir, prefs) = temp_prefs();
        add_category(&prefs, "Sours").unwrap();
        assert_eq!(
            add_category(&prefs, "Sours").unwrap_err(),
            "Category already exists."
        );
        assert_eq!(
            add_category(&prefs, "  ").unwrap_err(),
            "Category name cannot be empty."
        );
        assert_eq!(
            add_category(&prefs, "a,b").unwrap_err(),
            "Category names cannot contain commas."
        );
    }

    #[test]
    fn items_persist_under_their_category() {
        let (_dir, prefs) = temp_prefs();
        add_category(&prefs, "Sours").unwrap();
        add_category_item(&prefs, "Sours", item("Daiquiri", "9")).unwrap();
        add_category_item(&prefs, "Sours", item("Whiskey Sour", "7")).unwrap();
        let items = load_items(&prefs, "Sours");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], item("Daiquiri", "9"));
        // Items live under their own key, not in the names list.
        assert_eq!(load_names(&prefs), vec!["Sours"]);
    }

    #[test]
    fn ratings_must_be_digit_only() {
        let (_dir, prefs) = temp_prefs();
        add_category(&prefs, "Sours").unwrap();
        for bad in ["", "9.5", "ten", "-1"] {
            assert_eq!(
                add_category_item(&prefs, "Sours", item("Daiquiri", bad)).unwrap_err(),
                "Rating must be a whole number."
            );
        }
    }

    #[test]
    fn items_require_an_existing_category() {
        let (_dir, prefs) = temp_prefs();
        assert_eq!(
            add_category_item(&prefs, "Ghost", item("Daiquiri", "9")).unwrap_err(),
            "Category not found."
        );
    }
}
