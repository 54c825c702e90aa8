//! Tracks the state of background capture jobs.
//!
//! Taking a picture happens off the request path: the camera service
//! schedules a job, the pixel work runs on a blocking thread, and the form
//! polls the job's status until a storage reference is available. Worker
//! threads never write the shared status map directly; they push a
//! `JobUpdate` through an MPSC channel whose single consumer
//! (`start_job_updater`) applies updates in arrival order. That queue is the
//! only path from background completions back to shared state.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Shared container for the status of all capture jobs.
///
/// Created once in `main.rs` and injected into the Actix application as
/// `web::Data`. Readers (the status endpoint, the form poll) take the read
/// lock; only the updater task writes.
#[derive(Clone)]
pub struct JobsState {
    /// Map from job ID to its current status. The single source of truth
    /// for every capture in flight.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Sender half of the update channel. Capture workers clone this to
    /// report progress without touching the map themselves.
    pub tx: mpsc::Sender<JobUpdate>,
}

/// A status change for one capture job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobUpdate {
    pub fn new(job_id: String, status: JobStatus) -> JobUpdate {
        JobUpdate { job_id, status }
    }
}

/// Runs the single consumer of the update channel. Spawned once at startup;
/// applies each received update under the write lock.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id.clone(), update.status);
    }
}
