//! Playback clock
//!
//! Discrete, signed rate table mapping real elapsed time to virtual event time

/// Signed playback multipliers, slowest reverse to fastest forward.
pub const RATES: [f64; 17] = [
    -8.0, -4.0, -2.0, -1.0, -0.5, -0.1, -0.01, -0.001, 0.0, 0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 4.0,
    8.0,
];

/// Index of the zero rate in [`RATES`].
pub const PAUSED_INDEX: usize = RATES.len() / 2;

/// Rate change requested by the user, independent of any key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateCommand {
    Increase,
    Decrease,
    Pause,
}

/// Playback rate selector. Starts paused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackClock {
    rate_index: usize,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            rate_index: PAUSED_INDEX,
        }
    }

    pub fn rate_index(&self) -> usize {
        self.rate_index
    }

    pub fn rate(&self) -> f64 {
        RATES[self.rate_index]
    }

    pub fn is_paused(&self) -> bool {
        self.rate_index == PAUSED_INDEX
    }

    /// Step one entry faster (or less reversed). No-op at the top of the table.
    pub fn increase_rate(&mut self) {
        if self.rate_index + 1 < RATES.len() {
            self.rate_index += 1;
        }
    }

    /// Step one entry slower (or more reversed). No-op at the bottom of the table.
    pub fn decrease_rate(&mut self) {
        self.rate_index = self.rate_index.saturating_sub(1);
    }

    pub fn pause(&mut self) {
        self.rate_index = PAUSED_INDEX;
    }

    pub fn apply(&mut self, command: RateCommand) {
        match command {
            RateCommand::Increase => self.increase_rate(),
            RateCommand::Decrease => self.decrease_rate(),
            RateCommand::Pause => self.pause(),
        }
        tracing::debug!(rate = self.rate(), ?command, "playback rate changed");
    }

    /// Virtual time elapsed during `real_dt` seconds of wall-clock time.
    pub fn tick(&self, real_dt: f64) -> f64 {
        real_dt * self.rate()
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
