use crate::prefs::Prefs;
use crate::services::drinks::form::{FormState, MAX_INGREDIENT_ROWS};
use crate::services::drinks::{store, DEFAULT_IMAGE_REF};
use actix_web::{web, HttpResponse, Responder};
use common::model::drink::DrinkRecord;
use common::requests::SubmitDrinkRequest;

pub async fn process(
    payload: web::Json<SubmitDrinkRequest>,
    form: web::Data<FormState>,
    prefs: web::Data<Prefs>,
) -> impl Responder {
    match submit(&payload, &form, &prefs) {
        Ok(name) => HttpResponse::Ok().body(format!("Drink saved: {}", name)),
        Err(e) => HttpResponse::BadRequest().body(e),
    }
}

/// Validates and persists one drink. The record is appended only after
/// every check passes and the photo reference is resolved, so a partial or
/// invalid record never reaches storage.
pub fn submit(
    req: &SubmitDrinkRequest,
    form: &FormState,
    prefs: &Prefs,
) -> Result<String, String> {
    let mut guard = form
        .0
        .lock()
        .map_err(|_| "Form state unavailable".to_string())?;

    let catalogue = store::load(prefs);
    validate(req, &catalogue)?;

    let image_ref = guard
        .photo_ref()
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_IMAGE_REF.to_string());
    let record = DrinkRecord {
        name: req.name.clone(),
        image_ref,
        ingredients: req.ingredients.clone(),
        instructions: req.instructions.clone(),
    };
    store::append(prefs, record)?;
    guard.complete_submit();
    Ok(req.name.clone())
}

/// Checks run in a fixed order; the first failure produces the message.
fn validate(req: &SubmitDrinkRequest, catalogue: &[DrinkRecord]) -> Result<(), String> {
    if req.name.trim().is_empty() {
        return Err("Drink name cannot be empty.".to_string());
    }
    if catalogue.iter().any(|d| d.name == req.name) {
        return Err("A drink with this name already exists.".to_string());
    }
    if req.ingredients.is_empty() {
        return Err("Add at least one ingredient and measurement pair.".to_string());
    }
    if req.ingredients.len() > MAX_INGREDIENT_ROWS {
        return Err("No more ingredient rows available.".to_string());
    }
    for ingredient in &req.ingredients {
        if ingredient.name.trim().is_empty() || ingredient.measure.trim().is_empty() {
            return Err("Each ingredient needs both a name and a measurement.".to_string());
        }
    }
    if req.instructions.trim().is_empty() {
        return Err("Instructions cannot be empty.".to_string());
    }
    Ok(())
}
