//! Playback loop
//!
//! One thread, one loop: measure real time, advance the clock, let the source
//! render, query the overlay, publish, then yield to the display so it can
//! process input and redraw.

use crate::image::ImageBuffer;
use crate::overlay::{Marker, OverlaySource};
use crate::source::{PlaybackSource, SourceMode};
use crate::state::PlaybackState;
use crate::time::RateCommand;
use std::fmt;
use std::time::Instant;

/// Text shown next to the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    pub mode: SourceMode,
    pub rate: f64,
    pub virtual_time: f64,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate:{}  time:{:.3}", self.rate, self.virtual_time)
    }
}

/// Everything a display needs for one presented frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub image: &'a ImageBuffer,
    pub status: Status,
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Continue,
    Closed,
}

/// Output surface driven by [`run`].
pub trait Display {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Publish the current image, status and marker.
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Self::Error>;

    /// Yield to the windowing system. Any rate commands entered by the user
    /// are appended to `commands`.
    fn pump(&mut self, commands: &mut Vec<RateCommand>) -> DisplayStatus;
}

/// Owns the decoded recording, the playback state and the image.
pub struct Player {
    source: Box<dyn PlaybackSource>,
    overlay: Option<Box<dyn OverlaySource>>,
    state: PlaybackState,
    image: ImageBuffer,
    marker: Option<Marker>,
}

impl Player {
    pub fn new(source: Box<dyn PlaybackSource>) -> Self {
        let image = ImageBuffer::new(source.geometry());
        Self {
            source,
            overlay: None,
            state: PlaybackState::new(),
            image,
            marker: None,
        }
    }

    /// Attach an annotation overlay. Only event recordings carry annotations.
    pub fn with_overlay(mut self, overlay: Box<dyn OverlaySource>) -> Self {
        if self.source.mode() == SourceMode::Events {
            self.overlay = Some(overlay);
        } else {
            tracing::debug!("ignoring overlay for frame recording");
        }
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn source(&self) -> &dyn PlaybackSource {
        self.source.as_ref()
    }

    pub fn command(&mut self, command: RateCommand) {
        self.state.clock.apply(command);
    }

    pub fn status(&self) -> Status {
        Status {
            mode: self.source.mode(),
            rate: self.state.clock.rate(),
            virtual_time: self.state.virtual_time,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            image: &self.image,
            status: self.status(),
            marker: self.marker,
        }
    }

    /// Advance by `real_dt` seconds of wall-clock time.
    pub fn step(&mut self, real_dt: f64) -> Snapshot<'_> {
        let virtual_dt = self.state.clock.tick(real_dt);
        self.source
            .render(&mut self.state, &mut self.image, virtual_dt);
        self.marker = self
            .overlay
            .as_mut()
            .and_then(|overlay| overlay.marker_at(self.state.virtual_time));
        self.snapshot()
    }
}

/// Drive `player` until the display is closed.
pub fn run<D: Display>(player: &mut Player, display: &mut D) -> Result<(), D::Error> {
    tracing::info!(
        mode = %player.source().mode(),
        duration = player.source().duration(),
        "playback started"
    );

    let mut commands = Vec::new();
    let mut last = Instant::now();
    let mut ticks: u64 = 0;
    loop {
        let now = Instant::now();
        let real_dt = now.duration_since(last).as_secs_f64();
        last = now;

        for command in commands.drain(..) {
            player.command(command);
        }

        let snapshot = player.step(real_dt);
        display.present(&snapshot)?;
        ticks += 1;

        if display.pump(&mut commands) == DisplayStatus::Closed {
            tracing::info!(ticks, time = player.state().virtual_time, "playback stopped");
            return Ok(());
        }
    }
}
