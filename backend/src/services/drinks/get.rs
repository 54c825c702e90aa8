//! Detail view of one saved drink.
//!
//! Returns the full record plus its photo inlined as base64. A photo file
//! that has gone missing is reported in the payload rather than failing
//! the request; the client shows its "no image" state.

use crate::prefs::Prefs;
use crate::services::drinks::{default_image_bytes, store, DEFAULT_IMAGE_REF};
use actix_web::{web, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::warn;
use std::fs;
use std::path::Path;

pub async fn process(
    name: web::Path<String>,
    prefs: web::Data<Prefs>,
    config: web::Data<crate::config::Config>,
) -> impl Responder {
    match get_drink(&name, &prefs, &config.photos_dir()) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => HttpResponse::NotFound().body(e),
    }
}

pub fn get_drink(
    name: &str,
    prefs: &Prefs,
    photos_dir: &Path,
) -> Result<serde_json::Value, String> {
    let record = store::load(prefs)
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| "Drink not found".to_string())?;

    let (image, image_error) = match load_image_bytes(&record.image_ref, photos_dir) {
        Ok(bytes) => (Some(BASE64.encode(bytes)), None),
        Err(e) => {
            warn!("Could not load picture for drink {}: {}", record.name, e);
            (None, Some(e))
        }
    };

    Ok(serde_json::json!({
        "drink": record,
        "image": image,
        "image_error": image_error,
    }))
}

fn load_image_bytes(image_ref: &str, photos_dir: &Path) -> Result<Vec<u8>, String> {
    if image_ref == DEFAULT_IMAGE_REF {
        return default_image_bytes();
    }
    let path = photos_dir.join(image_ref);
    fs::read(&path).map_err(|e| format!("File does not exist at path {}: {}", path.display(), e))
}
