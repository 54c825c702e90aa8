//! # Recipe Search Service Module
//!
//! Thin client for the remote recipe API, under `/api/search`. The remote
//! side answers `search.php` (by name), `filter.php` (by ingredient) and
//! `lookup.php` (by id) with the same envelope: `{ "drinks": [...] }`,
//! where `drinks` is null when nothing matched.
//!
//! A failed request is reported to the caller and the result treated as
//! empty; there is no automatic retry. An unparseable response counts as
//! "no data", the same policy applied to persisted state.
//!
//! ## Registered Routes:
//!
//! *   **`GET /name`** and **`GET /name/{term}`**: Search by drink name;
//!     the empty term lists the remote catalogue's results unfiltered.
//! *   **`GET /ingredient/{term}`**: Search by ingredient.
//! *   **`GET /lookup/{id}`**: Full drink by remote id.

use crate::config::Config;
use actix_web::web::{self, get, scope};
use actix_web::{HttpResponse, Responder, Scope};
use common::model::remote::{DrinkResponse, DrinkSummary, RemoteDrink};
use log::{error, warn};

const API_PATH: &str = "/api/search";

/// Listings surface at most this many results.
const RESULT_LIMIT: usize = 20;

/// Configures and returns the Actix scope for search routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/name", get().to(by_name_unfiltered))
        .route("/name/{term}", get().to(by_name))
        .route("/ingredient/{term}", get().to(by_ingredient))
        .route("/lookup/{id}", get().to(lookup))
}

async fn by_name_unfiltered(
    client: web::Data<reqwest::Client>,
    config: web::Data<Config>,
) -> impl Responder {
    respond(fetch_envelope(&client, &config, "search.php", "s", "").await)
}

async fn by_name(
    term: web::Path<String>,
    client: web::Data<reqwest::Client>,
    config: web::Data<Config>,
) -> impl Responder {
    respond(fetch_envelope(&client, &config, "search.php", "s", &term).await)
}

async fn by_ingredient(
    term: web::Path<String>,
    client: web::Data<reqwest::Client>,
    config: web::Data<Config>,
) -> impl Responder {
    respond(fetch_envelope(&client, &config, "filter.php", "i", &term).await)
}

async fn lookup(
    id: web::Path<String>,
    client: web::Data<reqwest::Client>,
    config: web::Data<Config>,
) -> impl Responder {
    match fetch_envelope(&client, &config, "lookup.php", "i", &id).await {
        Ok(drinks) => match drinks.into_iter().next() {
            Some(drink) => HttpResponse::Ok().json(drink),
            None => HttpResponse::NotFound().body("Drink not found"),
        },
        Err(e) => {
            error!("Drink lookup failed: {}", e);
            HttpResponse::BadGateway().body(format!("Error: {}", e))
        }
    }
}

async fn fetch_envelope(
    client: &reqwest::Client,
    config: &Config,
    endpoint: &str,
    param: &str,
    value: &str,
) -> Result<Vec<RemoteDrink>, String> {
    let url = format!("{}/{}", config.api_url, endpoint);
    let response = client
        .get(&url)
        .query(&[(param, value)])
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;
    let text = response.text().await.map_err(|e| e.to_string())?;
    match serde_json::from_str::<DrinkResponse>(&text) {
        Ok(envelope) => Ok(envelope.drinks.unwrap_or_default()),
        Err(e) => {
            warn!("Unparseable response from recipe API: {}", e);
            Ok(Vec::new())
        }
    }
}

fn summarize(drinks: &[RemoteDrink]) -> Vec<DrinkSummary> {
    drinks.iter().take(RESULT_LIMIT).map(DrinkSummary::of).collect()
}

fn respond(result: Result<Vec<RemoteDrink>, String>) -> HttpResponse {
    match result {
        Ok(drinks) => HttpResponse::Ok().json(summarize(&drinks)),
        Err(e) => {
            error!("Drink search failed: {}", e);
            HttpResponse::BadGateway().body(format!("Error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drink(id: usize) -> RemoteDrink {
        RemoteDrink {
            id: Some(format!("{}", 11000 + id)),
            name: Some(format!("Drink {}", id)),
            thumb: Some(format!("https://example.test/{}/preview", id)),
            ..RemoteDrink::default()
        }
    }

    #[test]
    fn summaries_are_capped_at_the_listing_limit() {
        let drinks: Vec<RemoteDrink> = (0..30).map(drink).collect();
        let summaries = summarize(&drinks);
        assert_eq!(summaries.len(), RESULT_LIMIT);
        assert_eq!(summaries[0].name, "Drink 0");
    }

    #[test]
    fn summaries_use_the_small_thumbnail_variant() {
        let summaries = summarize(&[drink(1)]);
        assert_eq!(
            summaries[0].thumb.as_deref(),
            Some("https://example.test/1/100x100")
        );
    }
}
