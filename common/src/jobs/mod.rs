use serde::{Deserialize, Serialize};

/// Status of a background capture job. `Completed` carries the stored image
/// reference (the file name under the photos directory).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed(String),
    Failed(String),
}
