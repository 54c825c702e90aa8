//! # Camera Service Module
//!
//! Owns the live camera feed and the photo-capture pipeline. All endpoints
//! live under `/api/camera`.
//!
//! ## Registered Routes:
//!
//! *   **`POST /start`**: Acquires the camera device and begins streaming.
//!     Re-initializing stops the prior stream first. A missing or denied
//!     device is reported; the feed simply stays inactive.
//!
//! *   **`POST /stop`**: Releases the device. Safe to call repeatedly.
//!
//! *   **`GET /feed`**: Reports `{ active, ready }`. Device initialization
//!     is asynchronous and takes a variable number of frames, so callers
//!     poll this until `ready` is true instead of assuming availability.
//!
//! *   **`POST /capture`**: Schedules a capture job and immediately returns
//!     its `job_id`. The job waits for the next complete frame, runs the
//!     orientation/crop/resample/encode pipeline, and writes the photo.
//!     Rejected while the feed is inactive or another capture is in flight.
//!
//! *   **`GET /status/{job_id}`**: Polls a capture job. `Completed` carries
//!     the stored image reference.

pub mod feed;
pub mod snapshot;

use crate::config::Config;
use crate::job_controller::state::{JobUpdate, JobsState};
use actix_web::web::{self, get, post, scope};
use actix_web::{HttpResponse, Responder, Scope};
use common::jobs::JobStatus;
use common::requests::CaptureRequest;
use crate::services::camera::feed::CameraFeed;
use log::{error, info};
use std::path::PathBuf;
use uuid::Uuid;

const API_PATH: &str = "/api/camera";

/// Configures and returns the Actix scope for camera routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/start", post().to(start))
        .route("/stop", post().to(stop))
        .route("/feed", get().to(feed_status))
        .route("/capture", post().to(capture))
        .route("/status/{job_id}", get().to(get_status))
}

async fn start(camera: web::Data<CameraFeed>) -> impl Responder {
    let camera = camera.into_inner();
    match tokio::task::spawn_blocking(move || camera.start()).await {
        Ok(Ok(())) => HttpResponse::Ok().body("Camera feed started"),
        Ok(Err(e)) => {
            error!("Failed to start camera feed: {}", e);
            HttpResponse::ServiceUnavailable().body(format!("Error starting camera: {}", e))
        }
        Err(e) => HttpResponse::InternalServerError().body(format!("Error starting camera: {}", e)),
    }
}

async fn stop(camera: web::Data<CameraFeed>) -> impl Responder {
    let camera = camera.into_inner();
    match tokio::task::spawn_blocking(move || camera.stop()).await {
        Ok(()) => HttpResponse::Ok().body("Camera feed stopped"),
        Err(e) => HttpResponse::InternalServerError().body(format!("Error stopping camera: {}", e)),
    }
}

async fn feed_status(camera: web::Data<CameraFeed>) -> impl Responder {
    let camera = camera.into_inner();
    if !camera.is_active() {
        return HttpResponse::Ok().json(serde_json::json!({ "active": false, "ready": false }));
    }
    match tokio::task::spawn_blocking(move || camera.poke()).await {
        Ok(Ok(ready)) => {
            HttpResponse::Ok().json(serde_json::json!({ "active": true, "ready": ready }))
        }
        Ok(Err(e)) => HttpResponse::ServiceUnavailable().body(format!("Error: {}", e)),
        Err(e) => HttpResponse::InternalServerError().body(format!("Error: {}", e)),
    }
}

async fn capture(
    state: web::Data<JobsState>,
    camera: web::Data<CameraFeed>,
    config: web::Data<Config>,
    payload: web::Json<CaptureRequest>,
) -> impl Responder {
    match schedule_capture_job(&state, &camera, config.photos_dir(), payload.into_inner()).await {
        Ok(job_id) => HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id })),
        Err(e) => HttpResponse::Conflict().body(e),
    }
}

/// Registers the job as `Pending`, hands the pixel work to a blocking
/// thread, and reports progress exclusively through the job updater queue.
/// The in-flight guard is released on every exit path.
pub(crate) async fn schedule_capture_job(
    state: &web::Data<JobsState>,
    camera: &web::Data<CameraFeed>,
    photos_dir: PathBuf,
    req: CaptureRequest,
) -> Result<String, String> {
    if !camera.is_active() {
        return Err("Camera feed is not active".to_string());
    }
    camera.begin_capture()?;

    let job_id = Uuid::new_v4().to_string();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let tx = state.tx.clone();
    let job_id_clone = job_id.clone();
    let camera = camera.clone().into_inner();
    tokio::spawn(async move {
        let _ = tx
            .send(JobUpdate::new(job_id_clone.clone(), JobStatus::InProgress))
            .await;

        let worker_camera = camera.clone();
        let orientation = req.orientation;
        let result = tokio::task::spawn_blocking(move || {
            // Grab the frame and run the pipeline; the guard opens again no
            // matter how this ends.
            let outcome = worker_camera.ready_frame().and_then(|frame| {
                let photo = snapshot::process_frame(frame, orientation)?;
                snapshot::save_png(&photos_dir, photo)
            });
            worker_camera.finish_capture();
            outcome
        })
        .await;

        let status = match result {
            Ok(Ok(file_name)) => {
                info!("Photo saved to: {}", file_name);
                JobStatus::Completed(file_name)
            }
            Ok(Err(e)) => {
                error!("Capture failed: {}", e);
                JobStatus::Failed(e)
            }
            Err(e) => {
                camera.finish_capture();
                error!("Capture worker did not finish: {}", e);
                JobStatus::Failed(e.to_string())
            }
        };
        let _ = tx.send(JobUpdate::new(job_id_clone, status)).await;
    });

    Ok(job_id)
}

async fn get_status(job_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    let jobs = state.jobs.read().await;
    if let Some(status) = jobs.get(&job_id.into_inner()) {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::NotFound().body("Job ID not found")
    }
}
