//! Value to RGBA conversion
//!
//! Event images are signed sums of polarities shown on a white-to-black ramp
//! over [-1, 1]; frame images are normalized intensities shown black-to-white
//! over [0, 1]. The annotation marker is blended on top on the CPU.

use glam::Vec2;
use rayon::prelude::*;
use replay_core::{ImageBuffer, Marker, SourceMode};

pub const MARKER_COLOR: [u8; 3] = [255, 255, 0];
pub const MARKER_ALPHA: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Colormap {
    /// Low values white, high values black.
    Binary { vmin: f64, vmax: f64 },
    /// Low values black, high values white.
    BinaryReversed { vmin: f64, vmax: f64 },
}

impl Colormap {
    pub fn for_mode(mode: SourceMode) -> Self {
        match mode {
            SourceMode::Events => Colormap::Binary {
                vmin: -1.0,
                vmax: 1.0,
            },
            SourceMode::Frames => Colormap::BinaryReversed {
                vmin: 0.0,
                vmax: 1.0,
            },
        }
    }

    /// Gray level for `value`, clamped to the colormap range.
    pub fn gray(&self, value: f64) -> u8 {
        let level = match *self {
            Colormap::Binary { vmin, vmax } => 1.0 - normalize(value, vmin, vmax),
            Colormap::BinaryReversed { vmin, vmax } => normalize(value, vmin, vmax),
        };
        (level * 255.0).round() as u8
    }
}

fn normalize(value: f64, vmin: f64, vmax: f64) -> f64 {
    if vmax <= vmin || value.is_nan() {
        return 0.0;
    }
    ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
}

fn blend(base: u8, over: u8) -> u8 {
    ((1.0 - MARKER_ALPHA) * base as f32 + MARKER_ALPHA * over as f32).round() as u8
}

/// Fill `rgba` with the colormapped image, row 0 first, plus the marker if any.
pub fn colorize(
    image: &ImageBuffer,
    colormap: Colormap,
    marker: Option<Marker>,
    rgba: &mut Vec<u8>,
) {
    let width = image.width();
    rgba.resize(image.values().len() * 4, 0);
    if width == 0 {
        return;
    }

    rgba.par_chunks_mut(width * 4)
        .zip(image.values().par_chunks(width))
        .enumerate()
        .for_each(|(y, (out_row, row))| {
            for (x, (pixel, &value)) in out_row.chunks_exact_mut(4).zip(row).enumerate() {
                let gray = colormap.gray(value);
                let mut color = [gray, gray, gray];
                if let Some(marker) = marker {
                    if marker.contains(Vec2::new(x as f32, y as f32)) {
                        for (channel, &over) in color.iter_mut().zip(&MARKER_COLOR) {
                            *channel = blend(*channel, over);
                        }
                    }
                }
                pixel.copy_from_slice(&[color[0], color[1], color[2], 255]);
            }
        });
}
