//! Pluggable playback sources
//!
//! Event and frame recordings share one playback loop. Each mode decodes its
//! own stream once and then renders into the shared image every tick.

use crate::accumulate::AccumulationRenderer;
use crate::error::DecodeError;
use crate::event::{EventLayout, EventStream};
use crate::frame::{FrameLayout, FrameStream};
use crate::image::{ImageBuffer, SensorGeometry};
use crate::select::FrameSelector;
use crate::state::PlaybackState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    #[default]
    Events,
    Frames,
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Events => write!(f, "events"),
            SourceMode::Frames => write!(f, "frames"),
        }
    }
}

/// A decoded recording that can render itself at any virtual time.
pub trait PlaybackSource {
    fn mode(&self) -> SourceMode;

    fn geometry(&self) -> SensorGeometry;

    /// Last timestamp of the recording, in seconds.
    fn duration(&self) -> f64;

    /// Advance `state` by `virtual_dt` and update `image` accordingly.
    fn render(&self, state: &mut PlaybackState, image: &mut ImageBuffer, virtual_dt: f64);
}

/// Everything needed to decode a recording in either mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub events: EventLayout,
    pub frames: FrameLayout,
    pub decay_time: Option<f64>,
    pub rebase_timestamps: bool,
}

impl SourceConfig {
    /// Decode `bytes` with the layout selected by `mode`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Box<dyn PlaybackSource>, DecodeError> {
        let source: Box<dyn PlaybackSource> = match self.mode {
            SourceMode::Events => {
                let mut stream = EventStream::decode(bytes, &self.events)?;
                if self.rebase_timestamps {
                    stream = stream.rebased();
                }
                let renderer = self
                    .decay_time
                    .map(AccumulationRenderer::new)
                    .unwrap_or_default();
                Box::new(EventSource::new(stream, renderer))
            }
            SourceMode::Frames => {
                let stream = FrameStream::decode(bytes, &self.frames)?;
                Box::new(FrameSource::new(stream))
            }
        };
        tracing::info!(
            mode = %source.mode(),
            duration = source.duration(),
            "recording decoded"
        );
        Ok(source)
    }
}

pub struct EventSource {
    stream: EventStream,
    renderer: AccumulationRenderer,
}

impl EventSource {
    pub fn new(stream: EventStream, renderer: AccumulationRenderer) -> Self {
        Self { stream, renderer }
    }
}

impl PlaybackSource for EventSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Events
    }

    fn geometry(&self) -> SensorGeometry {
        self.stream.geometry()
    }

    fn duration(&self) -> f64 {
        self.stream.duration()
    }

    fn render(&self, state: &mut PlaybackState, image: &mut ImageBuffer, virtual_dt: f64) {
        self.renderer.advance(&self.stream, state, image, virtual_dt);
    }
}

pub struct FrameSource {
    stream: FrameStream,
    selector: FrameSelector,
}

impl FrameSource {
    pub fn new(stream: FrameStream) -> Self {
        Self {
            stream,
            selector: FrameSelector::new(),
        }
    }
}

impl PlaybackSource for FrameSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Frames
    }

    fn geometry(&self) -> SensorGeometry {
        self.stream.geometry()
    }

    fn duration(&self) -> f64 {
        self.stream.duration()
    }

    fn render(&self, state: &mut PlaybackState, image: &mut ImageBuffer, virtual_dt: f64) {
        self.selector.advance(&self.stream, state, image, virtual_dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_events_by_default() {
        let config = SourceConfig::default();
        let bytes = config.events.encode(3, 4, 1, 1, 2_000_000);
        let source = config.decode(&bytes).unwrap();
        assert_eq!(source.mode(), SourceMode::Events);
        assert_eq!(source.duration(), 2.0);
        assert_eq!(source.geometry(), SensorGeometry::DAVIS240);
    }

    #[test]
    fn rebase_applies_to_event_mode() {
        let config = SourceConfig {
            rebase_timestamps: true,
            ..SourceConfig::default()
        };
        let mut bytes = config.events.encode(0, 0, 1, 1, 2_000_000);
        bytes.extend(config.events.encode(0, 0, 1, 1, 3_000_000));
        assert_eq!(config.decode(&bytes).unwrap().duration(), 1.0);
    }

    #[test]
    fn frame_mode_uses_frame_layout() {
        let config = SourceConfig {
            mode: SourceMode::Frames,
            frames: FrameLayout {
                geometry: SensorGeometry::new(2, 2),
                ..FrameLayout::default()
            },
            ..SourceConfig::default()
        };
        let bytes = config.frames.encode(250_000, &[1, 2, 3, 4]);
        let source = config.decode(&bytes).unwrap();
        assert_eq!(source.mode(), SourceMode::Frames);
        assert_eq!(source.duration(), 0.25);
    }

    #[test]
    fn decode_errors_propagate() {
        let config = SourceConfig {
            mode: SourceMode::Frames,
            ..SourceConfig::default()
        };
        assert!(matches!(
            config.decode(&[0u8; 8]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn mode_names() {
        assert_eq!(SourceMode::Events.to_string(), "events");
        assert_eq!(SourceMode::Frames.to_string(), "frames");
    }
}
