//! Sensor geometry and the persistent intensity buffer

/// Pixel resolution of the recording sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorGeometry {
    pub width: u32,
    pub height: u32,
}

impl SensorGeometry {
    /// DAVIS240 resolution.
    pub const DAVIS240: SensorGeometry = SensorGeometry {
        width: 240,
        height: 180,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        (x as u32) < self.width && (y as u32) < self.height
    }
}

impl Default for SensorGeometry {
    fn default() -> Self {
        Self::DAVIS240
    }
}

/// Row-major `height x width` intensity buffer.
///
/// Accumulates signed event contributions in event mode and holds the
/// normalized frame in frame mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    values: Vec<f64>,
    width: usize,
    height: usize,
}

impl ImageBuffer {
    pub fn new(geometry: SensorGeometry) -> Self {
        Self {
            values: vec![0.0; geometry.pixel_count()],
            width: geometry.width as usize,
            height: geometry.height as usize,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.values[y * self.width + x])
        } else {
            None
        }
    }

    /// Add `amount` at pixel (x, y). Returns false when the pixel is outside the buffer.
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, amount: f64) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.values[y * self.width + x] += amount;
        true
    }

    /// Multiply every pixel by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.values {
            *v *= factor;
        }
    }
}
