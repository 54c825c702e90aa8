//! # Favorites Service Module
//!
//! Maintains the user's favorites list of remote drinks under
//! `/api/favorites`. The list is persisted as one JSON document under the
//! `FavoriteDrinks` key.
//!
//! ## Registered Routes:
//!
//! *   **`GET /`**: Returns the full favorites list.
//! *   **`POST /`**: Adds a drink; a drink already on the list is rejected
//!     with a message instead of being duplicated.
//! *   **`DELETE /{id}`**: Removes the favorite with the given remote id.

use crate::prefs::Prefs;
use actix_web::web::{self, delete, get, post, scope};
use actix_web::{HttpResponse, Responder, Scope};
use common::model::remote::{FavoritesList, RemoteDrink};
use log::warn;

const API_PATH: &str = "/api/favorites";
const FAVORITES_KEY: &str = "FavoriteDrinks";

/// Configures and returns the Actix scope for favorites routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list))
        .route("", post().to(add))
        .route("/{id}", delete().to(remove))
}

async fn list(prefs: web::Data<Prefs>) -> impl Responder {
    HttpResponse::Ok().json(load(&prefs))
}

async fn add(prefs: web::Data<Prefs>, payload: web::Json<RemoteDrink>) -> impl Responder {
    let drink = payload.into_inner();
    let name = drink.name.clone().unwrap_or_default();
    match add_favorite(&prefs, drink) {
        Ok(true) => HttpResponse::Ok().body(format!("Added to favorites: {}", name)),
        Ok(false) => HttpResponse::Conflict().body(format!("Drink already in favorites: {}", name)),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error saving favorite: {}", e)),
    }
}

async fn remove(id: web::Path<String>, prefs: web::Data<Prefs>) -> impl Responder {
    match remove_favorite(&prefs, &id) {
        Ok(true) => HttpResponse::Ok().body("Favorite removed"),
        Ok(false) => HttpResponse::NotFound().body("Favorite not found"),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error removing favorite: {}", e))
        }
    }
}

pub fn load(prefs: &Prefs) -> Vec<RemoteDrink> {
    match prefs.get_string(FAVORITES_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<FavoritesList>(&json) {
            Ok(list) => list.drinks,
            Err(e) => {
                warn!("Persisted favorites are unreadable, treating as empty: {}", e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not read favorites: {}", e);
            Vec::new()
        }
    }
}

fn persist(prefs: &Prefs, drinks: Vec<RemoteDrink>) -> Result<(), String> {
    let json = serde_json::to_string(&FavoritesList { drinks }).map_err(|e| e.to_string())?;
    prefs.set_string(FAVORITES_KEY, &json)
}

fn is_same(a: &RemoteDrink, b: &RemoteDrink) -> bool {
    match (&a.id, &b.id) {
        (Some(left), Some(right)) => left == right,
        _ => a.name.is_some() && a.name == b.name,
    }
}

/// Returns `Ok(false)` when the drink is already on the list.
pub fn add_favorite(prefs: &Prefs, drink: RemoteDrink) -> Result<bool, String> {
    let mut drinks = load(prefs);
    if drinks.iter().any(|existing| is_same(existing, &drink)) {
        return Ok(false);
    }
    drinks.push(drink);
    persist(prefs, drinks)?;
    Ok(true)
}

pub fn remove_favorite(prefs: &Prefs, id: &str) -> Result<bool, String> {
    let mut drinks = load(prefs);
    let before = drinks.len();
    drinks.retain(|drink| drink.id.as_deref() != Some(id));
    if drinks.len() == before {
        return Ok(false);
    }
    persist(prefs, drinks)?;
    Ok(true)
}
