use crate::prefs::Prefs;
use crate::services::drinks::{discard_photo, store};
use actix_web::{web, HttpResponse, Responder};
use std::path::Path;

pub async fn process(
    name: web::Path<String>,
    prefs: web::Data<Prefs>,
    config: web::Data<crate::config::Config>,
) -> impl Responder {
    match delete_drink(&name, &prefs, &config.photos_dir()) {
        Ok(true) => HttpResponse::Ok().body(format!("Drink deleted: {}", name)),
        Ok(false) => HttpResponse::NotFound().body("Drink not found"),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error deleting drink: {}", e)),
    }
}

/// Removes the record and releases its photo file. The record owns the
/// file, so they go together; the bundled default image is shared and is
/// never deleted.
pub fn delete_drink(name: &str, prefs: &Prefs, photos_dir: &Path) -> Result<bool, String> {
    match store::remove_by_name(prefs, name)? {
        Some(removed) => {
            discard_photo(photos_dir, &removed.image_ref);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::drinks::DEFAULT_IMAGE_REF;
    use common::model::drink::{DrinkRecord, Ingredient};
    use std::fs;

    fn record(name: &str, image_ref: &str) -> DrinkRecord {
        DrinkRecord {
            name: name.to_string(),
            image_ref: image_ref.to_string(),
            ingredients: vec![Ingredient {
                name: "Rum".to_string(),
                measure: "50ml".to_string(),
            }],
            instructions: "Mix and serve".to_string(),
        }
    }

    #[test]
    fn delete_removes_record_and_photo_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Prefs::open(dir.path()).unwrap();
        let photos_dir = dir.path().join("photos");
        fs::create_dir_all(&photos_dir).unwrap();
        fs::write(photos_dir.join("shot.png"), b"png bytes").unwrap();
        store::append(&prefs, record("Mojito", "shot.png")).unwrap();

        assert!(delete_drink("Mojito", &prefs, &photos_dir).unwrap());
        assert!(store::load(&prefs).is_empty());
        assert!(!photos_dir.join("shot.png").exists());
    }

    #[test]
    fn delete_of_unknown_drink_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Prefs::open(dir.path()).unwrap();
        assert!(!delete_drink("Negroni", &prefs, dir.path()).unwrap());
    }

    #[test]
    fn default_image_survives_record_deletion() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Prefs::open(dir.path()).unwrap();
        let photos_dir = dir.path().join("photos");
        fs::create_dir_all(&photos_dir).unwrap();
        // A stray file that happens to carry the default name must not be
        // claimed by any record.
        fs::write(photos_dir.join(DEFAULT_IMAGE_REF), b"shared").unwrap();
        store::append(&prefs, record("Mojito", DEFAULT_IMAGE_REF)).unwrap();

        assert!(delete_drink("Mojito", &prefs, &photos_dir).unwrap());
        assert!(photos_dir.join(DEFAULT_IMAGE_REF).exists());
    }
}
