use crate::time::PlaybackClock;

/// Mutable playback position shared by the clock and the active source.
///
/// In event mode `cursor` is the number of events with timestamp at or
/// before `virtual_time`, except after parking at the start where it is 0.
/// In frame mode it is the selected frame index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub clock: PlaybackClock,
    pub virtual_time: f64,
    pub cursor: usize,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop at `time`, used when playback runs off either end of the recording.
    pub fn park(&mut self, time: f64) {
        self.virtual_time = time;
        self.clock.pause();
        tracing::debug!(time, "playback reached the end of the recording");
    }
}
