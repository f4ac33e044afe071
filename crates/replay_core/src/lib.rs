//! DAVIS Replay Core
//!
//! Contains the event-time playback engine:
//! - Binary decoders for event and frame recordings
//! - Reversible playback clock with a discrete rate table
//! - Decaying accumulation renderer and frame selector
//! - The playback loop, written against display and overlay traits

pub mod accumulate;
pub mod error;
pub mod event;
pub mod frame;
pub mod image;
pub mod overlay;
pub mod playback;
pub mod select;
pub mod source;
pub mod state;
pub mod time;

pub use glam;

pub use accumulate::AccumulationRenderer;
pub use error::DecodeError;
pub use event::{EventLayout, EventStream};
pub use frame::{FrameLayout, FrameStream, SampleOrder};
pub use image::{ImageBuffer, SensorGeometry};
pub use overlay::{Marker, OverlaySource};
pub use playback::{run, Display, DisplayStatus, Player, Snapshot, Status};
pub use select::FrameSelector;
pub use source::{EventSource, FrameSource, PlaybackSource, SourceConfig, SourceMode};
pub use state::PlaybackState;
pub use time::{PlaybackClock, RateCommand, PAUSED_INDEX, RATES};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
