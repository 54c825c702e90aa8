//! Server-held state of the own-drink form.
//!
//! The form walks `Idle → Capturing → Reviewing` and back to `Idle` on
//! submit or reset. It owns any photo that has been captured but not yet
//! saved: requesting a new picture or abandoning the form discards the
//! orphaned file, and a successful submit hands the file over to the
//! catalogue. Handlers serialize every mutation through one mutex; the
//! catalogue store relies on that single writer.

use crate::config::Config;
use crate::job_controller::state::JobsState;
use crate::services::camera::feed::CameraFeed;
use crate::services::camera::schedule_capture_job;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::requests::CaptureRequest;
use std::sync::Mutex;

pub const MAX_INGREDIENT_ROWS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    /// A capture job is outstanding; the photo slot is empty so a stale
    /// image can never be submitted.
    Capturing { job_id: String },
    /// A captured photo sits in the slot awaiting submit or replacement.
    Reviewing,
}

pub struct DrinkForm {
    phase: FormPhase,
    photo_ref: Option<String>,
    active_rows: usize,
}

/// The form session, injected as shared application state.
pub struct FormState(pub Mutex<DrinkForm>);

impl Default for DrinkForm {
    fn default() -> DrinkForm {
        DrinkForm::new()
    }
}

impl DrinkForm {
    pub fn new() -> DrinkForm {
        DrinkForm {
            phase: FormPhase::Idle,
            photo_ref: None,
            active_rows: 1,
        }
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn photo_ref(&self) -> Option<&str> {
        self.photo_ref.as_deref()
    }

    pub fn active_rows(&self) -> usize {
        self.active_rows
    }

    pub fn capture_job(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Capturing { job_id } => Some(job_id),
            _ => None,
        }
    }

    /// Enters `Capturing`, clearing the photo slot. Returns the reference
    /// of any previously captured photo so the caller can discard the file.
    pub fn begin_capture(&mut self, job_id: String) -> Option<String> {
        let orphan = self.photo_ref.take();
        self.phase = FormPhase::Capturing { job_id };
        orphan
    }

    /// Applies the polled status of the outstanding capture job. A
    /// completed job fills the photo slot; a failed or vanished job drops
    /// the form back to `Idle`.
    pub fn observe_capture(&mut self, status: Option<&JobStatus>) {
        if !matches!(self.phase, FormPhase::Capturing { .. }) {
            return;
        }
        match status {
            Some(JobStatus::Completed(image_ref)) => {
                self.photo_ref = Some(image_ref.clone());
                self.phase = FormPhase::Reviewing;
            }
            Some(JobStatus::Failed(_)) | None => {
                self.phase = FormPhase::Idle;
            }
            Some(JobStatus::Pending) | Some(JobStatus::InProgress) => {}
        }
    }

    /// Reveals the next ingredient row. The row count is bounded; running
    /// out of rows is reported, not fatal.
    pub fn add_row(&mut self) -> Result<usize, String> {
        if self.active_rows >= MAX_INGREDIENT_ROWS {
            return Err("No more ingredient rows available.".to_string());
        }
        self.active_rows += 1;
        Ok(self.active_rows)
    }

    /// Resets after a successful submit. The photo slot is cleared without
    /// discarding the file: the saved record owns it now.
    pub fn complete_submit(&mut self) {
        self.photo_ref = None;
        self.active_rows = 1;
        self.phase = FormPhase::Idle;
    }

    /// Abandons the form. Returns the reference of an unsaved capture, if
    /// any, so the caller can discard the file.
    pub fn reset(&mut self) -> Option<String> {
        let orphan = self.photo_ref.take();
        self.active_rows = 1;
        self.phase = FormPhase::Idle;
        orphan
    }
}

/// `GET /api/drinks/form`: reports the form state, polling the capture
/// job first while one is outstanding.
pub(crate) async fn view(form: web::Data<FormState>, state: web::Data<JobsState>) -> impl Responder {
    let job_id = match form.0.lock() {
        Ok(guard) => guard.capture_job().map(str::to_string),
        Err(_) => return HttpResponse::InternalServerError().body("Form state unavailable"),
    };
    let status = match job_id {
        Some(id) => state.jobs.read().await.get(&id).cloned(),
        None => None,
    };

    let mut guard = match form.0.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("Form state unavailable"),
    };
    if guard.capture_job().is_some() {
        guard.observe_capture(status.as_ref());
    }

    let (phase, job_id) = match guard.phase() {
        FormPhase::Idle => ("idle", None),
        FormPhase::Capturing { job_id } => ("capturing", Some(job_id.clone())),
        FormPhase::Reviewing => ("reviewing", None),
    };
    HttpResponse::Ok().json(serde_json::json!({
        "phase": phase,
        "capture_job": job_id,
        "photo_ref": guard.photo_ref(),
        "active_rows": guard.active_rows(),
        "max_rows": MAX_INGREDIENT_ROWS,
    }))
}

/// `POST /api/drinks/form/picture`: delegates to the camera service and
/// clears the photo slot while the capture runs.
pub(crate) async fn picture(
    form: web::Data<FormState>,
    state: web::Data<JobsState>,
    camera: web::Data<CameraFeed>,
    config: web::Data<Config>,
    payload: web::Json<CaptureRequest>,
) -> impl Responder {
    // Fold in the result of any finished capture first; otherwise clearing
    // the slot below would leak that photo file.
    let pending = match form.0.lock() {
        Ok(guard) => guard.capture_job().map(str::to_string),
        Err(_) => return HttpResponse::InternalServerError().body("Form state unavailable"),
    };
    if let Some(id) = pending {
        let status = state.jobs.read().await.get(&id).cloned();
        if let Ok(mut guard) = form.0.lock() {
            guard.observe_capture(status.as_ref());
        }
    }

    let job_id = match schedule_capture_job(
        &state,
        &camera,
        config.photos_dir(),
        payload.into_inner(),
    )
    .await
    {
        Ok(job_id) => job_id,
        Err(e) => return HttpResponse::Conflict().body(e),
    };

    let orphan = match form.0.lock() {
        Ok(mut guard) => guard.begin_capture(job_id.clone()),
        Err(_) => return HttpResponse::InternalServerError().body("Form state unavailable"),
    };
    if let Some(orphan) = orphan {
        super::discard_photo(&config.photos_dir(), &orphan);
    }
    HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id }))
}

/// `POST /api/drinks/form/rows`: reveals the next ingredient row.
pub(crate) async fn rows(form: web::Data<FormState>) -> impl Responder {
    let result = match form.0.lock() {
        Ok(mut guard) => guard.add_row(),
        Err(_) => return HttpResponse::InternalServerError().body("Form state unavailable"),
    };
    match result {
        Ok(active_rows) => {
            HttpResponse::Ok().json(serde_json::json!({ "active_rows": active_rows }))
        }
        Err(e) => HttpResponse::BadRequest().body(e),
    }
}

/// `POST /api/drinks/form/reset`: abandons the form and discards any
/// unsaved capture.
pub(crate) async fn reset(form: web::Data<FormState>, config: web::Data<Config>) -> impl Responder {
    let orphan = match form.0.lock() {
        Ok(mut guard) => guard.reset(),
        Err(_) => return HttpResponse::InternalServerError().body("Form state unavailable"),
    };
    if let Some(orphan) = orphan {
        super::discard_photo(&config.photos_dir(), &orphan);
    }
    HttpResponse::Ok().body("Form reset")
}
