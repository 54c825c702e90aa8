use crate::prefs::Prefs;
use crate::services::drinks::store;
use actix_web::{web, HttpResponse, Responder};

/// One summary row per record, in catalogue order. Clients resolve
/// `image_ref` against `/photos/` (or the embedded default image).
pub async fn process(prefs: web::Data<Prefs>) -> impl Responder {
    let rows: Vec<serde_json::Value> = store::load(&prefs)
        .iter()
        .map(|drink| {
            serde_json::json!({
                "name": drink.name,
                "image_ref": drink.image_ref,
            })
        })
        .collect();
    HttpResponse::Ok().json(rows)
}
