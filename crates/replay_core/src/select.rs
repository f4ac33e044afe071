use crate::frame::FrameStream;
use crate::image::ImageBuffer;
use crate::state::PlaybackState;

/// Picks the frame at the current virtual time and normalizes it for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSelector;

impl FrameSelector {
    pub fn new() -> Self {
        Self
    }

    /// Advance playback by `virtual_dt` and publish the selected frame into `image`.
    ///
    /// Returns the selected frame index. The image is replaced by the frame
    /// divided by its own maximum; an all-zero frame leaves the image untouched.
    pub fn advance(
        &self,
        frames: &FrameStream,
        state: &mut PlaybackState,
        image: &mut ImageBuffer,
        virtual_dt: f64,
    ) -> usize {
        debug_assert!(!frames.is_empty(), "frame stream must hold at least one frame");
        if virtual_dt.is_finite() {
            state.virtual_time += virtual_dt;
        }

        let last = frames.len() - 1;
        let mut index = frames.insertion_point(state.virtual_time);
        if index > last {
            state.park(frames.duration());
            index = last;
        } else if state.virtual_time < 0.0 {
            state.park(0.0);
        }
        state.cursor = index;

        normalize_into(frames.frame(index), image);
        index
    }
}

fn normalize_into(samples: &[u16], image: &mut ImageBuffer) {
    let max = samples.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return;
    }
    let scale = 1.0 / max as f64;
    for (dst, &src) in image.values_mut().iter_mut().zip(samples) {
        *dst = src as f64 * scale;
    }
}
