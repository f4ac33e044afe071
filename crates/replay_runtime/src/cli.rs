//! Command-line arguments
//!
//! Flags override the settings file, which overrides built-in defaults.

use clap::{Parser, ValueEnum};
use replay_core::SourceMode;
use replay_services::{DisplayMode, SampleOrderSetting, Settings, SettingsError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "davis-replay",
    version,
    about = "Replay DAVIS event-camera recordings at adjustable speed"
)]
pub struct Cli {
    /// Recording to play: packed events, or timestamped frames with --mode frames.
    pub input: PathBuf,

    /// How to interpret the recording.
    #[arg(long, value_enum, default_value_t = ModeArg::Events)]
    pub mode: ModeArg,

    /// JSON settings file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sensor width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Sensor height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Bytes per event record (at least 8).
    #[arg(long)]
    pub record_size: Option<usize>,

    /// Seconds of virtual time for the event image to fade by half; 0 disables fading.
    #[arg(long)]
    pub decay_time: Option<f64>,

    /// Byte order of frame samples.
    #[arg(long, value_enum)]
    pub sample_order: Option<SampleOrderArg>,

    /// Presentation mode.
    #[arg(long, value_enum)]
    pub display: Option<DisplayArg>,

    /// Do not look for an annotation sidecar.
    #[arg(long)]
    pub no_annotation: bool,

    /// Shift event timestamps so the first one is zero.
    #[arg(long)]
    pub rebase: bool,

    /// Run without a window for this many ticks, then exit.
    #[arg(long)]
    pub headless_ticks: Option<u64>,

    /// Raise the playback rate this many steps before starting.
    #[arg(long, default_value_t = 0)]
    pub start_rate: u32,

    /// Print the effective settings as JSON and exit.
    #[arg(long)]
    pub dump_settings: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Events,
    Frames,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOrderArg {
    Big,
    Little,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayArg {
    Quick,
    Safe,
}

impl From<ModeArg> for SourceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Events => SourceMode::Events,
            ModeArg::Frames => SourceMode::Frames,
        }
    }
}

impl From<SampleOrderArg> for SampleOrderSetting {
    fn from(order: SampleOrderArg) -> Self {
        match order {
            SampleOrderArg::Big => SampleOrderSetting::Big,
            SampleOrderArg::Little => SampleOrderSetting::Little,
        }
    }
}

impl From<DisplayArg> for DisplayMode {
    fn from(mode: DisplayArg) -> Self {
        match mode {
            DisplayArg::Quick => DisplayMode::Quick,
            DisplayArg::Safe => DisplayMode::Safe,
        }
    }
}

impl Cli {
    /// Settings file (or defaults) with command-line overrides applied.
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        self.apply(&mut settings);
        Ok(settings)
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.sensor.width = width;
        }
        if let Some(height) = self.height {
            settings.sensor.height = height;
        }
        if let Some(record_size) = self.record_size {
            settings.events.record_size = record_size;
        }
        if let Some(decay_time) = self.decay_time {
            settings.events.decay_time = decay_time;
        }
        if let Some(order) = self.sample_order {
            settings.frames.sample_order = order.into();
        }
        if let Some(mode) = self.display {
            settings.display.mode = mode.into();
        }
        if self.no_annotation {
            settings.annotation.enabled = false;
        }
        if self.rebase {
            settings.events.rebase_timestamps = true;
        }
    }
}
