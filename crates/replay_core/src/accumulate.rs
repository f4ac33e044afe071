use crate::event::EventStream;
use crate::image::ImageBuffer;
use crate::state::PlaybackState;
use std::ops::Range;

/// Default fade constant, in seconds of virtual time.
pub const DEFAULT_DECAY_TIME: f64 = 0.01;

/// Decaying event accumulator.
///
/// Every tick the whole image fades by `1 - |dt| / (|dt| + decay_time)`, then
/// each event crossed by the tick adds its polarity weighted by how long ago
/// (in the direction of travel) it occurred:
///
///   weight = 1 - age / (age + decay_time)
///
/// Playing backward crosses the same events in reverse, so the image shows
/// what happened "most recently" from the viewer's point of view. With
/// `decay_time == 0` there is no fading and every event adds its full polarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulationRenderer {
    decay_time: f64,
}

impl AccumulationRenderer {
    pub fn new(decay_time: f64) -> Self {
        Self {
            decay_time: decay_time.max(0.0),
        }
    }

    pub fn decay_time(&self) -> f64 {
        self.decay_time
    }

    /// Fade factor applied to the whole image for a tick of `virtual_dt`.
    /// `None` when nothing fades.
    pub fn decay_factor(&self, virtual_dt: f64) -> Option<f64> {
        if virtual_dt == 0.0 || self.decay_time <= 0.0 {
            return None;
        }
        let span = virtual_dt.abs();
        Some(1.0 - span / (span + self.decay_time))
    }

    #[inline]
    fn weight(&self, age: f64) -> f64 {
        if self.decay_time > 0.0 {
            1.0 - age / (age + self.decay_time)
        } else {
            1.0
        }
    }

    /// Advance playback by `virtual_dt` and integrate the crossed events.
    ///
    /// Returns the index window that was rendered. Auto-pauses at either end
    /// of the recording. Parking at the start rewinds the cursor to 0, so
    /// events stamped exactly 0 are deposited again on the next forward tick.
    pub fn advance(
        &self,
        events: &EventStream,
        state: &mut PlaybackState,
        image: &mut ImageBuffer,
        virtual_dt: f64,
    ) -> Range<usize> {
        if virtual_dt == 0.0 || !virtual_dt.is_finite() {
            return state.cursor..state.cursor;
        }
        debug_assert!(state.cursor <= events.len(), "cursor past the end of the stream");

        if let Some(factor) = self.decay_factor(virtual_dt) {
            image.scale(factor);
        }

        let now = state.virtual_time;
        let target = now + virtual_dt;
        let timestamps = events.timestamps();

        let window = if virtual_dt > 0.0 {
            let count = events.count_until(state.cursor, events.len(), target);
            let window = state.cursor..state.cursor + count;
            for i in window.clone() {
                let age = virtual_dt - (timestamps[i] - now);
                self.deposit(events, image, i, age);
            }
            state.cursor = window.end;
            window
        } else {
            let new_cursor = events.count_until(0, state.cursor, target);
            let window = new_cursor..state.cursor;
            for i in window.clone() {
                let age = -virtual_dt - (now - timestamps[i]);
                self.deposit(events, image, i, age);
            }
            state.cursor = new_cursor;
            window
        };

        state.virtual_time = target;
        let duration = events.duration();
        if virtual_dt > 0.0 && state.virtual_time >= duration {
            state.park(duration);
        } else if virtual_dt < 0.0 && state.virtual_time <= 0.0 {
            state.park(0.0);
            state.cursor = 0;
        }

        tracing::trace!(
            start = window.start,
            end = window.end,
            cursor = state.cursor,
            time = state.virtual_time,
            "accumulated event window"
        );
        window
    }

    #[inline]
    fn deposit(&self, events: &EventStream, image: &mut ImageBuffer, i: usize, age: f64) {
        let amount = events.polarity()[i] as f64 * self.weight(age);
        image.add(events.x()[i] as usize, events.y()[i] as usize, amount);
    }
}

impl Default for AccumulationRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DECAY_TIME)
    }
}
