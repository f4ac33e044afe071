//! Declarative annotation sidecar files
//!
//! A sidecar sits next to the recording (`<recording><suffix>`) and holds a
//! JSON document:
//!
//! ```json
//! { "fields": ["x", "y", "r"],
//!   "frames": [ { "t": 0.5, "x": 120, "y": 90, "r": 10 },
//!               { "t": 0.75, "x": 130 } ] }
//! ```
//!
//! `fields` may be omitted, in which case every key used by a frame (other
//! than `t`) becomes a field.

use crate::error::AnnotationLoadError;
use crate::trace::AnnotationTrace;
use replay_core::{Marker, OverlaySource};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Suffix appended to the recording path unless configured otherwise.
pub const DEFAULT_SUFFIX: &str = ".label";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TraceDocument {
    #[serde(default)]
    fields: Option<Vec<String>>,
    frames: Vec<FrameRecord>,
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    t: f64,
    #[serde(flatten)]
    values: BTreeMap<String, f64>,
}

/// `<recording><suffix>`, e.g. `run1.bin` -> `run1.bin.label`.
pub fn sidecar_path(recording: &Path, suffix: &str) -> PathBuf {
    let mut path: OsString = recording.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Parse a sidecar document into a trace.
pub fn parse_trace(text: &str) -> Result<AnnotationTrace, AnnotationLoadError> {
    let document: TraceDocument = serde_json::from_str(text)?;

    let fields: Vec<String> = match document.fields {
        Some(fields) => fields,
        None => document
            .frames
            .iter()
            .flat_map(|frame| frame.values.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let mut trace = AnnotationTrace::new(fields);
    for frame in &document.frames {
        trace.frame(
            frame.t,
            frame.values.iter().map(|(name, &value)| (name.as_str(), value)),
        )?;
    }
    Ok(trace)
}

/// Read and parse a sidecar file.
pub fn load_trace(path: &Path) -> Result<AnnotationTrace, AnnotationLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| AnnotationLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}

/// Overlay backed by a sidecar file that may be edited while playing.
///
/// The file is read on every query and re-parsed whenever its contents
/// differ from the last read, so edits are seen regardless of how coarse the
/// filesystem's modification times are. A missing or broken file yields no
/// marker.
pub struct SidecarOverlay {
    path: PathBuf,
    contents: Option<String>,
    trace: Option<AnnotationTrace>,
    last_error: Option<String>,
}

impl SidecarOverlay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: None,
            trace: None,
            last_error: None,
        }
    }

    /// Overlay for `recording`, looking for `<recording><suffix>`.
    pub fn for_recording(recording: &Path, suffix: &str) -> Self {
        Self::new(sidecar_path(recording, suffix))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Currently loaded trace, if the sidecar exists and parsed.
    pub fn trace(&self) -> Option<&AnnotationTrace> {
        self.trace.as_ref()
    }

    /// Re-read the sidecar and reparse it if its contents changed.
    pub fn refresh(&mut self) {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if self.contents.take().is_some() {
                    tracing::info!(path = %self.path.display(), "annotation sidecar removed");
                }
                self.trace = None;
                self.last_error = None;
                return;
            }
            Err(source) => {
                self.contents = None;
                self.fail(AnnotationLoadError::Io {
                    path: self.path.clone(),
                    source,
                });
                return;
            }
        };

        if self.contents.as_deref() == Some(text.as_str()) {
            return;
        }

        match parse_trace(&text) {
            Ok(trace) => {
                tracing::info!(
                    path = %self.path.display(),
                    frames = trace.len(),
                    "annotation sidecar loaded"
                );
                self.trace = Some(trace);
                self.last_error = None;
            }
            Err(err) => self.fail(err),
        }
        self.contents = Some(text);
    }

    fn fail(&mut self, err: AnnotationLoadError) {
        let message = err.to_string();
        if self.last_error.as_deref() != Some(message.as_str()) {
            tracing::warn!(path = %self.path.display(), error = %message, "annotation unavailable");
        }
        self.last_error = Some(message);
        self.trace = None;
    }
}

impl OverlaySource for SidecarOverlay {
    fn marker_at(&mut self, virtual_time: f64) -> Option<Marker> {
        self.refresh();
        self.trace.as_ref()?.marker_at(virtual_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_suffix_to_full_name() {
        assert_eq!(
            sidecar_path(Path::new("/data/run1.bin"), ".label"),
            PathBuf::from("/data/run1.bin.label")
        );
    }

    #[test]
    fn parses_declared_fields() {
        let trace = parse_trace(
            r#"{ "fields": ["x", "y", "r"],
                 "frames": [ { "t": 0.5, "x": 120, "y": 90, "r": 10 },
                             { "t": 0.75, "x": 130 } ] }"#,
        )
        .unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.get(0.75, "y"), Some(90.0));
        assert_eq!(trace.get(0.625, "x"), Some(125.0));
    }

    #[test]
    fn infers_fields_from_frames() {
        let trace =
            parse_trace(r#"{ "frames": [ { "t": 0, "x": 1, "y": 2, "r": 3 } ] }"#).unwrap();
        assert_eq!(trace.fields().collect::<Vec<_>>(), vec!["r", "x", "y"]);
    }

    #[test]
    fn undeclared_keys_are_ignored() {
        let trace = parse_trace(
            r#"{ "fields": ["x"], "frames": [ { "t": 0, "x": 1, "note": 7 } ] }"#,
        )
        .unwrap();
        assert_eq!(trace.fields().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_trace("Trace(['x'])"),
            Err(AnnotationLoadError::Parse(_))
        ));
        assert!(matches!(
            parse_trace(r#"{ "frames": [ { "x": 1 } ] }"#),
            Err(AnnotationLoadError::Parse(_))
        ));
    }

    #[test]
    fn rejects_missing_initial_value() {
        assert!(matches!(
            parse_trace(r#"{ "fields": ["x", "y"], "frames": [ { "t": 0, "x": 1 } ] }"#),
            Err(AnnotationLoadError::MissingInitialValue { .. })
        ));
    }

    #[test]
    fn missing_file_is_no_marker() {
        let mut overlay = SidecarOverlay::new("/nonexistent/recording.bin.label");
        assert_eq!(overlay.marker_at(0.0), None);
        assert!(overlay.trace().is_none());
    }
}
