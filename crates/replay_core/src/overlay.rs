//! Annotation overlay seam

use glam::Vec2;

/// Circle drawn over the image, in sensor pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Vec2,
    pub radius: f32,
}

impl Marker {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

/// Supplies an optional marker for a given virtual time.
///
/// Implementations must treat any failure as "no marker"; playback never
/// stops because of an overlay.
pub trait OverlaySource {
    fn marker_at(&mut self, virtual_time: f64) -> Option<Marker>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let marker = Marker::new(5.0, 5.0, 2.0);
        assert!(marker.contains(Vec2::new(5.0, 7.0)));
        assert!(marker.contains(Vec2::new(6.0, 6.0)));
        assert!(!marker.contains(Vec2::new(8.0, 5.0)));
    }
}
