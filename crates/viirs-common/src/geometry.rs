//! Vector geometry used for spatial catalog filters.
//!
//! Coordinates are `(x, y)` pairs, i.e. `(longitude, latitude)` for
//! geographic geometries.

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// A single position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Orientation of a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
    /// Zero signed area (collinear or repeated vertices)
    Degenerate,
}

/// A closed sequence of positions.
///
/// The first vertex is always repeated as the last one; [`LinearRing::new`]
/// closes open input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRing {
    coords: Vec<(f64, f64)>,
}

impl LinearRing {
    /// Build a ring, closing it if the last vertex differs from the first.
    pub fn new(mut coords: Vec<(f64, f64)>) -> Self {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last {
                coords.push(first);
            }
        }
        Self { coords }
    }

    /// Vertices including the closing vertex.
    pub fn coords(&self) -> &[(f64, f64)] {
        &self.coords
    }

    /// Number of distinct vertices (the closing vertex is not counted).
    pub fn vertex_count(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    /// Twice the signed area (shoelace). Positive for counter-clockwise rings.
    pub fn signed_area2(&self) -> f64 {
        self.coords
            .windows(2)
            .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
            .sum()
    }

    pub fn winding(&self) -> Winding {
        let area = self.signed_area2();
        if area > 0.0 {
            Winding::CounterClockwise
        } else if area < 0.0 {
            Winding::Clockwise
        } else {
            Winding::Degenerate
        }
    }

    pub fn is_ccw(&self) -> bool {
        self.winding() == Winding::CounterClockwise
    }

    /// Same vertices in the opposite order.
    pub fn reversed(&self) -> Self {
        let mut coords = self.coords.clone();
        coords.reverse();
        Self { coords }
    }

    /// Return the ring with counter-clockwise winding, reversing it if needed.
    ///
    /// Degenerate rings are returned unchanged, so applying this twice always
    /// gives the same ring as applying it once.
    pub fn into_ccw(self) -> Self {
        match self.winding() {
            Winding::Clockwise => self.reversed(),
            Winding::CounterClockwise | Winding::Degenerate => self,
        }
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.coords.iter().copied())
    }
}

/// A polygon with an exterior ring and optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: LinearRing,
    #[serde(default)]
    interiors: Vec<LinearRing>,
}

impl Polygon {
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Polygon without holes from raw exterior coordinates.
    pub fn from_exterior(coords: Vec<(f64, f64)>) -> Self {
        Self::new(LinearRing::new(coords), Vec::new())
    }

    /// Axis-aligned rectangle, wound counter-clockwise.
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::from_exterior(vec![
            (bbox.min_x, bbox.min_y),
            (bbox.max_x, bbox.min_y),
            (bbox.max_x, bbox.max_y),
            (bbox.min_x, bbox.max_y),
        ])
    }

    pub fn exterior(&self) -> &LinearRing {
        &self.exterior
    }

    pub fn interiors(&self) -> &[LinearRing] {
        &self.interiors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ccw() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    #[test]
    fn test_ring_is_closed() {
        let ring = LinearRing::new(square_ccw());
        assert_eq!(ring.coords().len(), 5);
        assert_eq!(ring.coords().first(), ring.coords().last());
        assert_eq!(ring.vertex_count(), 4);

        let already_closed = LinearRing::new(ring.coords().to_vec());
        assert_eq!(already_closed, ring);
    }

    #[test]
    fn test_winding() {
        let ccw = LinearRing::new(square_ccw());
        assert_eq!(ccw.winding(), Winding::CounterClockwise);
        assert_eq!(ccw.reversed().winding(), Winding::Clockwise);

        let flat = LinearRing::new(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(flat.winding(), Winding::Degenerate);
        assert_eq!(flat.clone().into_ccw(), flat);
    }

    #[test]
    fn test_into_ccw_keeps_ccw_ring() {
        let ring = LinearRing::new(square_ccw());
        assert_eq!(ring.clone().into_ccw(), ring);
    }

    #[test]
    fn test_into_ccw_reverses_cw_ring_once() {
        let cw = LinearRing::new(square_ccw()).reversed();
        let fixed = cw.clone().into_ccw();
        assert_eq!(fixed, cw.reversed());
        assert!(fixed.is_ccw());
        assert_eq!(fixed.clone().into_ccw(), fixed);
    }

    #[test]
    fn test_polygon_from_bbox_is_ccw() {
        let polygon = Polygon::from_bbox(&BoundingBox::new(-10.0, 30.0, 5.0, 40.0));
        assert!(polygon.exterior().is_ccw());
        assert!(polygon.interiors().is_empty());
    }
}
