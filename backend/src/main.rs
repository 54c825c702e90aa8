mod config;
mod job_controller;
mod prefs;
mod services;

use crate::config::Config;
use crate::job_controller::state::JobsState;
use crate::prefs::Prefs;
use crate::services::camera::feed::CameraFeed;
use crate::services::drinks::form::{DrinkForm, FormState};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::info;
use mime_guess::from_path;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let host = "127.0.0.1";
    let port = 8080;
    let url = format!("http://{}:{}", host, port);

    let config = Config::load();
    let prefs = Prefs::open(&config.data_dir).map_err(std::io::Error::other)?;
    let photos_dir = config.photos_dir();
    std::fs::create_dir_all(&photos_dir)?;

    {
        let _url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&_url_clone);
        });
    }

    // Initialize capture job state and its single-consumer updater.
    let (tx, rx) = mpsc::channel(100);
    let jobs_state = JobsState {
        jobs: Arc::new(RwLock::new(HashMap::new())),
        tx,
    };
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        job_controller::state::start_job_updater(updater_state, rx).await;
    });

    // Every shared service is constructed here and handed to the app
    // explicitly; nothing is resolved lazily.
    let camera = web::Data::new(CameraFeed::with_device());
    let form = web::Data::new(FormState(Mutex::new(DrinkForm::new())));
    let http_client = web::Data::new(reqwest::Client::new());
    let config_data = web::Data::new(config);
    let prefs_data = web::Data::new(prefs);

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(camera.clone())
            .app_data(form.clone())
            .app_data(http_client.clone())
            .app_data(config_data.clone())
            .app_data(prefs_data.clone())
            .service(services::camera::configure_routes())
            .service(services::drinks::configure_routes())
            .service(services::favorites::configure_routes())
            .service(services::categories::configure_routes())
            .service(services::search::configure_routes())
            .service(actix_files::Files::new("/photos", photos_dir.clone()))
            .default_service(web::route().to(serve_embedded))
    })
    .bind((host, port))?
    .run()
    .await
}
