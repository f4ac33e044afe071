//! Settings management

use replay_annotate::DEFAULT_SUFFIX;
use replay_core::accumulate::DEFAULT_DECAY_TIME;
use replay_core::event::{DEFAULT_MAX_EVENTS, MIN_EVENT_RECORD};
use replay_core::{EventLayout, FrameLayout, SampleOrder, SensorGeometry, SourceConfig, SourceMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Replay settings. Every section may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub sensor: SensorSettings,
    pub events: EventSettings,
    pub frames: FrameSettings,
    pub display: DisplaySettings,
    pub annotation: AnnotationSettings,
    pub input: InputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub record_size: usize,
    /// Seconds of virtual time for the image to fade by half; 0 disables fading.
    pub decay_time: f64,
    pub max_events: Option<usize>,
    pub rebase_timestamps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SampleOrderSetting {
    #[default]
    Big,
    Little,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FrameSettings {
    pub sample_order: SampleOrderSetting,
}

/// How the window trades latency for portability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Draw as soon as a frame is published, without vsync.
    #[default]
    Quick,
    /// Draw from the window system's redraw event with vsync.
    Safe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub mode: DisplayMode,
    /// Window pixels per sensor pixel.
    pub scale: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    pub enabled: bool,
    pub suffix: String,
}

/// Key names (as reported by the window system) bound to rate commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub increase: Vec<String>,
    pub decrease: Vec<String>,
    pub pause: Vec<String>,
}

impl Default for SensorSettings {
    fn default() -> Self {
        let geometry = SensorGeometry::DAVIS240;
        Self {
            width: geometry.width,
            height: geometry.height,
        }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            record_size: MIN_EVENT_RECORD,
            decay_time: DEFAULT_DECAY_TIME,
            max_events: Some(DEFAULT_MAX_EVENTS),
            rebase_timestamps: false,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Quick,
            scale: 3,
            title: "DAVIS Replay".to_string(),
        }
    }
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            increase: vec!["ArrowRight".to_string()],
            decrease: vec!["ArrowLeft".to_string()],
            pause: vec!["Space".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> String {
        // Infallible for this data: string keys, no custom serializers.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn geometry(&self) -> SensorGeometry {
        SensorGeometry::new(self.sensor.width, self.sensor.height)
    }

    /// Decoder and renderer configuration for `mode`.
    pub fn source_config(&self, mode: SourceMode) -> SourceConfig {
        let geometry = self.geometry();
        SourceConfig {
            mode,
            events: EventLayout {
                record_size: self.events.record_size,
                max_events: self.events.max_events,
                ..EventLayout::with_geometry(geometry)
            },
            frames: FrameLayout {
                geometry,
                sample_order: match self.frames.sample_order {
                    SampleOrderSetting::Big => SampleOrder::BigEndian,
                    SampleOrderSetting::Little => SampleOrder::LittleEndian,
                },
            },
            decay_time: Some(self.events.decay_time),
            rebase_timestamps: self.events.rebase_timestamps,
        }
    }
}
