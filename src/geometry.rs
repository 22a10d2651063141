//! Geometric primitives for transect generation.
//!
//! Coordinates are planar and share the spatial reference of the source layer,
//! so everything is `f64` to keep projected map units exact.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (easting).
    pub x: f64,
    /// Y coordinate (northing).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation between two points, per coordinate.
    ///
    /// Exact at both ends: `t == 0.0` yields `self`, `t == 1.0` yields `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let s = 1.0 - t;
        Self::new(self.x * s + other.x * t, self.y * s + other.y * t)
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl Line {
    /// Create a new line segment.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Get the length of the line.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Four corner points forming a closed ring, in the winding order of the source layer.
///
/// Rectangularity is not enforced on construction; see [`Rectangle::check_rectangular`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    vertices: [Point; 4],
}

impl Rectangle {
    /// Create a rectangle from its four corners.
    #[must_use]
    pub const fn new(vertices: [Point; 4]) -> Self {
        Self { vertices }
    }

    /// Build a rectangle from a vertex ring.
    ///
    /// Accepts four points, or five when the ring is explicitly closed
    /// (last point equal to the first), as stored by polygon layers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for any other vertex count.
    pub fn from_ring(ring: &[Point]) -> Result<Self> {
        let open = match ring {
            [first, .., last] if ring.len() == 5 && first == last => &ring[..4],
            _ => ring,
        };
        match *open {
            [a, b, c, d] => Ok(Self::new([a, b, c, d])),
            _ => Err(Error::invalid(format!(
                "Rectangle ring must have exactly four vertices, found {}.",
                open.len()
            ))),
        }
    }

    /// The four corners.
    #[must_use]
    pub const fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }

    /// Lengths of the first two edges: `(|v0 v1|, |v1 v2|)`.
    #[must_use]
    pub fn side_lengths(&self) -> (f64, f64) {
        let [v0, v1, v2, _] = self.vertices;
        (v0.distance(v1), v1.distance(v2))
    }

    /// Closed ring (first corner repeated at the end), for writing polygon geometry.
    #[must_use]
    pub fn closed_ring(&self) -> [Point; 5] {
        let [v0, v1, v2, v3] = self.vertices;
        [v0, v1, v2, v3, v0]
    }

    /// Verify that the ring is a true rectangle.
    ///
    /// Opposite sides must match in length and adjacent sides must be
    /// perpendicular, both relative to `tolerance` times the longest side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] describing the first violated condition.
    pub fn check_rectangular(&self, tolerance: f64) -> Result<()> {
        let [v0, v1, v2, v3] = self.vertices;
        let sides = [v0.distance(v1), v1.distance(v2), v2.distance(v3), v3.distance(v0)];
        let longest = sides.iter().copied().fold(0.0, f64::max);
        if longest <= 0.0 {
            return Err(Error::invalid("Rectangle is degenerate (all corners coincide)."));
        }
        let eps = tolerance * longest;

        if (sides[0] - sides[2]).abs() > eps || (sides[1] - sides[3]).abs() > eps {
            return Err(Error::invalid(format!(
                "Ring is not rectangular: opposite sides differ ({:.6} vs {:.6}, {:.6} vs {:.6}).",
                sides[0], sides[2], sides[1], sides[3]
            )));
        }

        for (i, corner) in self.vertices.iter().enumerate() {
            let prev = self.vertices[(i + 3) % 4];
            let next = self.vertices[(i + 1) % 4];
            let (ax, ay) = (prev.x - corner.x, prev.y - corner.y);
            let (bx, by) = (next.x - corner.x, next.y - corner.y);
            // |a·b| / |a||b| is the cosine of the corner angle
            let dot = (ax * bx + ay * by).abs();
            let norm = prev.distance(*corner) * next.distance(*corner);
            if norm <= 0.0 || dot / norm > tolerance {
                return Err(Error::invalid(format!(
                    "Ring is not rectangular: corner {i} is not a right angle."
                )));
            }
        }
        Ok(())
    }
}
