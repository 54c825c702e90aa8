//! # Own-Drink Service Module
//!
//! Everything around user-authored drinks: the form session, the durable
//! catalogue, and the listing/detail/delete endpoints, all under
//! `/api/drinks`.
//!
//! ## Registered Routes:
//!
//! *   **`GET /`**: One summary row per saved drink, in catalogue order.
//!
//! *   **`GET /form`**: Current form state. While a capture is outstanding
//!     this polls the capture job and, on completion, moves the storage
//!     reference into the photo slot.
//!
//! *   **`POST /form/picture`**: Takes a picture for the form. The previous
//!     photo slot is cleared (and its file discarded) so a stale image can
//!     never be submitted.
//!
//! *   **`POST /form/rows`**: Reveals the next ingredient row, up to the
//!     fixed maximum.
//!
//! *   **`POST /form/submit`**: Validates and persists the drink, falling
//!     back to the bundled default image when no photo was captured.
//!
//! *   **`POST /form/reset`**: Abandons the form and discards any unsaved
//!     capture.
//!
//! *   **`GET /{name}`**: Full record with the photo inlined as base64.
//!
//! *   **`DELETE /{name}`**: Removes the record and its photo file. The
//!     client confirms with the user before calling this.

mod delete;
mod get;
mod list;
mod save;

pub mod form;
pub mod store;

use actix_web::web::{delete as http_delete, get, post, scope};
use actix_web::Scope;
use log::warn;
use std::fs;
use std::path::Path;

const API_PATH: &str = "/api/drinks";

/// Image reference recorded when the user saves a drink without taking a
/// picture. The bytes ship inside the binary.
pub const DEFAULT_IMAGE_REF: &str = "default_drink.png";

static DEFAULT_IMAGE: &[u8] = include_bytes!("../../../static/dist/default_drink.png");

pub fn default_image_bytes() -> Result<Vec<u8>, String> {
    Ok(DEFAULT_IMAGE.to_vec())
}

/// Deletes a photo file that no record references anymore. The shared
/// default image is never removed. A missing file is reported and ignored.
pub(crate) fn discard_photo(photos_dir: &Path, image_ref: &str) {
    if image_ref == DEFAULT_IMAGE_REF || image_ref.is_empty() {
        return;
    }
    let path = photos_dir.join(image_ref);
    if let Err(e) = fs::remove_file(&path) {
        warn!("Could not remove photo {}: {}", path.display(), e);
    }
}

/// Configures and returns the Actix scope for own-drink routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/form", get().to(form::view))
        .route("/form/picture", post().to(form::picture))
        .route("/form/rows", post().to(form::rows))
        .route("/form/submit", post().to(save::process))
        .route("/form/reset", post().to(form::reset))
        .route("/{name}", get().to(get::process))
        .route("/{name}", http_delete().to(delete::process))
}
