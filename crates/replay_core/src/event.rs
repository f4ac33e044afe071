//! Event recordings
//!
//! DAVIS polarity events are stored as fixed-size records. The first four
//! bytes pack the pixel address together with two flag bits, the next four
//! hold the microsecond timestamp with byte 4 least significant.

use crate::error::DecodeError;
use crate::image::SensorGeometry;

/// Smallest record able to hold address and timestamp.
pub const MIN_EVENT_RECORD: usize = 8;

/// Default cap on decoded events.
pub const DEFAULT_MAX_EVENTS: usize = 10_000_000;

const POLARITY_BIT: u8 = 0x02;
const VALIDITY_BIT: u8 = 0x01;
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Byte layout of one event record.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLayout {
    pub record_size: usize,
    pub y_shift: u32,
    pub x_shift: u32,
    pub max_events: Option<usize>,
    pub geometry: SensorGeometry,
}

impl Default for EventLayout {
    fn default() -> Self {
        Self {
            record_size: MIN_EVENT_RECORD,
            y_shift: 2,
            x_shift: 1,
            max_events: Some(DEFAULT_MAX_EVENTS),
            geometry: SensorGeometry::DAVIS240,
        }
    }
}

impl EventLayout {
    pub fn with_geometry(geometry: SensorGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Pack one event into a record that [`EventStream::decode`] reads back unchanged.
    ///
    /// `y` must fit in `16 - y_shift` bits and `x` in `16 - x_shift` bits.
    pub fn encode(&self, x: u16, y: u16, polarity: i8, validity: i8, micros: u32) -> Vec<u8> {
        let mut record = vec![0u8; self.record_size.max(MIN_EVENT_RECORD)];
        let y_word = ((y as u32) << self.y_shift) as u16;
        let x_word = ((x as u32) << self.x_shift) as u16;

        let [y_lo, y_hi] = y_word.to_le_bytes();
        let mut flags = 0u8;
        if polarity > 0 {
            flags |= POLARITY_BIT;
        }
        if validity > 0 {
            flags |= VALIDITY_BIT;
        }
        record[0] = y_lo | flags;
        record[1] = y_hi;
        record[2..4].copy_from_slice(&x_word.to_le_bytes());
        record[4..8].copy_from_slice(&micros.to_le_bytes());
        record
    }
}

/// Parallel, index-aligned event arrays ordered by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct EventStream {
    x: Vec<u16>,
    y: Vec<u16>,
    polarity: Vec<i8>,
    validity: Vec<i8>,
    timestamp: Vec<f64>,
    geometry: SensorGeometry,
}

impl EventStream {
    /// Decode every complete record in `bytes`. A trailing partial record is dropped.
    pub fn decode(bytes: &[u8], layout: &EventLayout) -> Result<Self, DecodeError> {
        if layout.record_size < MIN_EVENT_RECORD {
            return Err(DecodeError::RecordTooSmall {
                record_size: layout.record_size,
                minimum: MIN_EVENT_RECORD,
            });
        }
        if layout.geometry.pixel_count() == 0 {
            return Err(DecodeError::EmptyGeometry {
                width: layout.geometry.width,
                height: layout.geometry.height,
            });
        }
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        if bytes.len() < layout.record_size {
            return Err(DecodeError::Truncated {
                len: bytes.len(),
                record_size: layout.record_size,
            });
        }

        let mut count = bytes.len() / layout.record_size;
        if let Some(max) = layout.max_events {
            if count > max {
                tracing::warn!(records = count, max, "recording truncated to event cap");
                count = max;
            }
        }
        let trailing = bytes.len() % layout.record_size;
        if trailing != 0 {
            tracing::debug!(trailing, "dropping partial trailing record");
        }

        let mut stream = Self {
            x: Vec::with_capacity(count),
            y: Vec::with_capacity(count),
            polarity: Vec::with_capacity(count),
            validity: Vec::with_capacity(count),
            timestamp: Vec::with_capacity(count),
            geometry: layout.geometry,
        };

        let mut outside = 0usize;
        for record in bytes.chunks_exact(layout.record_size).take(count) {
            let y = (u16::from_le_bytes([record[0], record[1]]) as u32 >> layout.y_shift) as u16;
            let x = (u16::from_le_bytes([record[2], record[3]]) as u32 >> layout.x_shift) as u16;
            let micros = u32::from_le_bytes([record[4], record[5], record[6], record[7]]);

            if !layout.geometry.contains(x, y) {
                outside += 1;
            }

            stream.x.push(x);
            stream.y.push(y);
            stream.polarity.push(flag(record[0], POLARITY_BIT));
            stream.validity.push(flag(record[0], VALIDITY_BIT));
            stream.timestamp.push(micros as f64 / MICROS_PER_SECOND);
        }

        if outside > 0 {
            tracing::warn!(
                outside,
                width = layout.geometry.width,
                height = layout.geometry.height,
                "events outside the sensor geometry will not be rendered"
            );
        }
        if !stream.is_monotonic() {
            tracing::warn!("event timestamps are not monotonic; seeking may skip events");
        }
        tracing::debug!(
            events = stream.len(),
            first = stream.timestamp.first().copied().unwrap_or(0.0),
            last = stream.duration(),
            "decoded event stream"
        );

        Ok(stream)
    }

    /// Subtract the first timestamp so playback starts at the first event.
    pub fn rebased(mut self) -> Self {
        if let Some(&origin) = self.timestamp.first() {
            for t in &mut self.timestamp {
                *t -= origin;
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }

    pub fn geometry(&self) -> SensorGeometry {
        self.geometry
    }

    pub fn x(&self) -> &[u16] {
        &self.x
    }

    pub fn y(&self) -> &[u16] {
        &self.y
    }

    pub fn polarity(&self) -> &[i8] {
        &self.polarity
    }

    /// The reserved 0x01 flag, decoded like polarity but never rendered.
    pub fn validity(&self) -> &[i8] {
        &self.validity
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamp
    }

    /// Timestamp of the last event, in seconds.
    pub fn duration(&self) -> f64 {
        self.timestamp.last().copied().unwrap_or(0.0)
    }

    pub fn is_monotonic(&self) -> bool {
        self.timestamp.windows(2).all(|w| w[0] <= w[1])
    }

    /// Number of events in `[from, to)` with timestamp at or before `target`.
    ///
    /// Relies on the monotonic-timestamp invariant.
    pub fn count_until(&self, from: usize, to: usize, target: f64) -> usize {
        debug_assert!(from <= to && to <= self.len(), "window {from}..{to} out of range");
        self.timestamp[from..to].partition_point(|&t| t <= target)
    }
}

#[inline]
fn flag(byte: u8, bit: u8) -> i8 {
    if byte & bit == bit {
        1
    } else {
        -1
    }
}
