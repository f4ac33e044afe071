//! Replay Annotations
//!
//! Optional time-varying markers (e.g. a tracked target's position and
//! radius) loaded from a declarative sidecar next to the recording.

pub mod error;
pub mod sidecar;
pub mod trace;

pub use error::AnnotationLoadError;
pub use sidecar::{load_trace, parse_trace, sidecar_path, SidecarOverlay, DEFAULT_SUFFIX};
pub use trace::AnnotationTrace;
