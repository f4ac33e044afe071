use std::path::PathBuf;
use thiserror::Error;

/// Why an annotation sidecar could not be used.
///
/// Never fatal: callers treat every variant as "no annotation available".
#[derive(Debug, Error)]
pub enum AnnotationLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed annotation document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("field '{field}' has no value in the first frame (t = {time})")]
    MissingInitialValue { field: String, time: f64 },

    #[error("frame time {time} precedes previous frame time {previous}")]
    NonMonotonic { previous: f64, time: f64 },

    #[error("frame time {time} is not a finite number")]
    InvalidTime { time: f64 },
}
