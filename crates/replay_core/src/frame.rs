//! Frame recordings
//!
//! Each record is a 4-byte little-endian microsecond timestamp followed by
//! one full sensor frame of 16-bit samples, row-major.

use crate::error::DecodeError;
use crate::image::SensorGeometry;

const TIMESTAMP_BYTES: usize = 4;
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Byte order of each 16-bit sample pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleOrder {
    /// First byte of the pair is the high byte.
    #[default]
    BigEndian,
    /// First byte of the pair is the low byte, as written natively by the recorder.
    LittleEndian,
}

impl SampleOrder {
    #[inline]
    fn read(self, pair: [u8; 2]) -> u16 {
        match self {
            SampleOrder::BigEndian => u16::from_be_bytes(pair),
            SampleOrder::LittleEndian => u16::from_le_bytes(pair),
        }
    }

    #[inline]
    fn write(self, value: u16) -> [u8; 2] {
        match self {
            SampleOrder::BigEndian => value.to_be_bytes(),
            SampleOrder::LittleEndian => value.to_le_bytes(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameLayout {
    pub geometry: SensorGeometry,
    pub sample_order: SampleOrder,
}

impl FrameLayout {
    pub fn record_size(&self) -> usize {
        TIMESTAMP_BYTES + self.geometry.pixel_count() * 2
    }

    /// Pack one frame record. `samples` must hold exactly one frame.
    pub fn encode(&self, micros: u32, samples: &[u16]) -> Vec<u8> {
        debug_assert_eq!(samples.len(), self.geometry.pixel_count());
        let mut record = Vec::with_capacity(self.record_size());
        record.extend_from_slice(&micros.to_le_bytes());
        for &sample in samples {
            record.extend_from_slice(&self.sample_order.write(sample));
        }
        record
    }
}

/// Timestamped full frames, samples stored contiguously.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStream {
    timestamps: Vec<f64>,
    samples: Vec<u16>,
    geometry: SensorGeometry,
}

impl FrameStream {
    pub fn decode(bytes: &[u8], layout: &FrameLayout) -> Result<Self, DecodeError> {
        let pixels = layout.geometry.pixel_count();
        if pixels == 0 {
            return Err(DecodeError::EmptyGeometry {
                width: layout.geometry.width,
                height: layout.geometry.height,
            });
        }
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        let record_size = layout.record_size();
        if bytes.len() < record_size {
            return Err(DecodeError::Truncated {
                len: bytes.len(),
                record_size,
            });
        }

        let count = bytes.len() / record_size;
        let mut timestamps = Vec::with_capacity(count);
        let mut samples = Vec::with_capacity(count * pixels);

        for record in bytes.chunks_exact(record_size) {
            let (head, body) = record.split_at(TIMESTAMP_BYTES);
            let micros = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
            timestamps.push(micros as f64 / MICROS_PER_SECOND);
            samples.extend(
                body.chunks_exact(2)
                    .map(|pair| layout.sample_order.read([pair[0], pair[1]])),
            );
        }

        let stream = Self {
            timestamps,
            samples,
            geometry: layout.geometry,
        };
        if !stream.is_monotonic() {
            tracing::warn!("frame timestamps are not monotonic; seeking may pick the wrong frame");
        }
        tracing::debug!(
            frames = stream.len(),
            last = stream.duration(),
            "decoded frame stream"
        );
        Ok(stream)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn geometry(&self) -> SensorGeometry {
        self.geometry
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn duration(&self) -> f64 {
        self.timestamps.last().copied().unwrap_or(0.0)
    }

    pub fn is_monotonic(&self) -> bool {
        self.timestamps.windows(2).all(|w| w[0] <= w[1])
    }

    /// Samples of frame `index`, row-major.
    pub fn frame(&self, index: usize) -> &[u16] {
        let pixels = self.geometry.pixel_count();
        &self.samples[index * pixels..(index + 1) * pixels]
    }

    /// First frame index whose timestamp is not before `time`.
    pub fn insertion_point(&self, time: f64) -> usize {
        self.timestamps.partition_point(|&t| t < time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_layout(order: SampleOrder) -> FrameLayout {
        FrameLayout {
            geometry: SensorGeometry::new(3, 2),
            sample_order: order,
        }
    }

    #[test]
    fn record_size_matches_davis240() {
        assert_eq!(FrameLayout::default().record_size(), 4 + 180 * 240 * 2);
    }

    #[test]
    fn decodes_big_endian_samples() {
        let layout = tiny_layout(SampleOrder::BigEndian);
        let mut bytes = vec![0x40, 0x42, 0x0f, 0x00]; // 1_000_000 us
        for v in [1u16, 2, 3, 0x0100, 0x0200, 0xffff] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }

        let stream = FrameStream::decode(&bytes, &layout).unwrap();
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.timestamps(), &[1.0]);
        assert_eq!(stream.frame(0), &[1, 2, 3, 0x0100, 0x0200, 0xffff]);
    }

    #[test]
    fn decodes_little_endian_samples() {
        let layout = tiny_layout(SampleOrder::LittleEndian);
        let mut bytes = vec![0, 0, 0, 0];
        bytes.extend_from_slice(&[0x34, 0x12, 0, 0, 0, 0, 0, 0, 0, 0, 0x01, 0x00]);
        let stream = FrameStream::decode(&bytes, &layout).unwrap();
        assert_eq!(stream.frame(0), &[0x1234, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn frames_are_split_per_record() {
        let layout = tiny_layout(SampleOrder::BigEndian);
        let mut bytes = layout.encode(0, &[0, 0, 0, 0, 0, 9]);
        bytes.extend(layout.encode(500_000, &[7, 0, 0, 0, 0, 0]));
        bytes.extend_from_slice(&[1, 2, 3]);

        let stream = FrameStream::decode(&bytes, &layout).unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.frame(0)[5], 9);
        assert_eq!(stream.frame(1)[0], 7);
        assert_eq!(stream.duration(), 0.5);
    }

    #[test]
    fn truncation_errors() {
        let layout = tiny_layout(SampleOrder::BigEndian);
        assert_eq!(FrameStream::decode(&[], &layout), Err(DecodeError::Empty));
        assert_eq!(
            FrameStream::decode(&[0u8; 10], &layout),
            Err(DecodeError::Truncated {
                len: 10,
                record_size: 16
            })
        );
    }

    #[test]
    fn insertion_point_is_left_biased() {
        let layout = tiny_layout(SampleOrder::BigEndian);
        let mut bytes = layout.encode(0, &[0; 6]);
        bytes.extend(layout.encode(1_000_000, &[0; 6]));
        let stream = FrameStream::decode(&bytes, &layout).unwrap();
        assert_eq!(stream.insertion_point(-0.5), 0);
        assert_eq!(stream.insertion_point(0.0), 0);
        assert_eq!(stream.insertion_point(0.5), 1);
        assert_eq!(stream.insertion_point(1.0), 1);
        assert_eq!(stream.insertion_point(1.5), 2);
    }
}
