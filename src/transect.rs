//! Evenly spaced transects across a rectangle.
//!
//! The generator picks two opposite edges of the rectangle and walks along
//! both at the same pace, joining the paired positions with a line segment.
//!
//! # Edge selection
//!
//! Only the first two sides are measured (`v0 v1` and `v1 v2`). Which pair of
//! edges is interpolated depends on the requested direction and on which of
//! those two sides is longer:
//!
//! | direction  | `side1 > side2`                  | otherwise                        |
//! |------------|----------------------------------|----------------------------------|
//! | horizontal | start `[v0, v1]`, end `[v3, v2]` | start `[v1, v2]`, end `[v0, v3]` |
//! | vertical   | start `[v1, v2]`, end `[v0, v3]` | start `[v0, v1]`, end `[v3, v2]` |
//!
//! The table is a fixed contract shared with layers produced by earlier
//! versions of the tool; it is not derived from the geometry.

use crate::error::{Error, Result};
use crate::geometry::{Line, Point, Rectangle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which family of parallel lines to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Horizontal transects.
    #[default]
    Horizontal,
    /// Vertical transects.
    Vertical,
}

impl Direction {
    /// The name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            _ => Err(Error::invalid(
                "The 'direction' parameter must be either 'horizontal' or 'vertical'.",
            )),
        }
    }
}

/// The two edges interpolated by the generator.
///
/// Transect `i` joins `start[0].lerp(start[1], f)` to `end[0].lerp(end[1], f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePair {
    /// Edge carrying the transect start points.
    pub start: [Point; 2],
    /// Edge carrying the transect end points.
    pub end: [Point; 2],
}

/// Pick the start and end edges for `direction` (see the module table).
#[must_use]
pub fn select_edges(rectangle: &Rectangle, direction: Direction) -> EdgePair {
    let [v0, v1, v2, v3] = *rectangle.vertices();
    let (side1, side2) = rectangle.side_lengths();
    let first_side_longer = side1 > side2;

    let along_first = EdgePair {
        start: [v0, v1],
        end: [v3, v2],
    };
    let along_second = EdgePair {
        start: [v1, v2],
        end: [v0, v3],
    };

    let pair = match (direction, first_side_longer) {
        (Direction::Horizontal, true) | (Direction::Vertical, false) => along_first,
        (Direction::Horizontal, false) | (Direction::Vertical, true) => along_second,
    };

    tracing::debug!(
        side1,
        side2,
        %direction,
        along_first_side = pair == along_first,
        "selected transect edges"
    );
    pair
}

/// One generated line segment and its position across the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transect {
    /// Sequence position, `0..=line_count`.
    pub index: usize,
    /// Interpolation fraction, `index / line_count`.
    pub fraction: f64,
    /// The segment itself.
    pub line: Line,
}

impl Transect {
    /// Start point (on the start edge).
    #[must_use]
    pub const fn start(&self) -> Point {
        self.line.start
    }

    /// End point (on the end edge).
    #[must_use]
    pub const fn end(&self) -> Point {
        self.line.end
    }
}

/// Generate `line_count + 1` evenly spaced transects across `rectangle`.
///
/// Both edges of the selected [`EdgePair`] are divided into `line_count`
/// equal steps; the first transect lies on the edge pair's leading corners
/// and the last on its trailing corners.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `line_count` is zero.
pub fn generate(
    rectangle: &Rectangle,
    line_count: u32,
    direction: Direction,
) -> Result<Vec<Transect>> {
    if line_count == 0 {
        return Err(Error::invalid("The line count must be a positive integer."));
    }

    let edges = select_edges(rectangle, direction);
    Ok(interpolate(&edges, line_count))
}

fn interpolate(edges: &EdgePair, line_count: u32) -> Vec<Transect> {
    let count = f64::from(line_count);
    (0..=line_count)
        .map(|i| {
            let fraction = f64::from(i) / count;
            let start = edges.start[0].lerp(edges.start[1], fraction);
            let end = edges.end[0].lerp(edges.end[1], fraction);
            Transect {
                index: i as usize,
                fraction,
                line: Line::new(start, end),
            }
        })
        .collect()
}

/// Configurable front-end to [`generate`].
///
/// ```rust
/// use trueno_transect::geometry::{Point, Rectangle};
/// use trueno_transect::transect::{Direction, TransectGenerator};
///
/// let field = Rectangle::new([
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 4.0),
///     Point::new(0.0, 4.0),
/// ]);
/// let lines = TransectGenerator::new(2)
///     .direction(Direction::Horizontal)
///     .generate(&field)
///     .unwrap();
/// assert_eq!(lines.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransectGenerator {
    line_count: u32,
    direction: Direction,
    tolerance: Option<f64>,
}

impl TransectGenerator {
    /// Generator producing `line_count + 1` horizontal transects.
    #[must_use]
    pub const fn new(line_count: u32) -> Self {
        Self {
            line_count,
            direction: Direction::Horizontal,
            tolerance: None,
        }
    }

    /// Set the transect direction.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Require the input to be a true rectangle within `tolerance`.
    #[must_use]
    pub const fn strict(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Run the generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a zero line count or, in strict
    /// mode, a ring that is not rectangular.
    pub fn generate(&self, rectangle: &Rectangle) -> Result<Vec<Transect>> {
        if self.line_count == 0 {
            return Err(Error::invalid("The line count must be a positive integer."));
        }
        if let Some(tolerance) = self.tolerance {
            rectangle.check_rectangular(tolerance)?;
        }
        generate(rectangle, self.line_count, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn field() -> Rectangle {
        Rectangle::new([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 4.0),
            Point::new(0.0, 4.0),
        ])
    }

    /// Same shape, but the short side comes first.
    fn tall_field() -> Rectangle {
        Rectangle::new([
            Point::new(0.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(10.0, 4.0),
            Point::new(10.0, 0.0),
        ])
    }

    fn endpoints(t: &Transect) -> ((f64, f64), (f64, f64)) {
        ((t.start().x, t.start().y), (t.end().x, t.end().y))
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("horizontal".parse::<Direction>().unwrap(), Direction::Horizontal);
        assert_eq!("vertical".parse::<Direction>().unwrap(), Direction::Vertical);
    }

    #[test]
    fn test_direction_parse_rejects_unknown() {
        for bad in ["diagonal", "", "Horizontal", " vertical"] {
            let err = bad.parse::<Direction>().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{bad:?}");
        }
    }

    #[test]
    fn test_direction_display_roundtrips() {
        for d in [Direction::Horizontal, Direction::Vertical] {
            assert_eq!(d.to_string().parse::<Direction>().unwrap(), d);
        }
    }

    #[test]
    fn test_select_edges_table() {
        let [v0, v1, v2, v3] = *field().vertices();
        // side1 (10) > side2 (4)
        let h = select_edges(&field(), Direction::Horizontal);
        assert_eq!(h, EdgePair { start: [v0, v1], end: [v3, v2] });
        let v = select_edges(&field(), Direction::Vertical);
        assert_eq!(v, EdgePair { start: [v1, v2], end: [v0, v3] });

        let [t0, t1, t2, t3] = *tall_field().vertices();
        // side1 (4) <= side2 (10)
        let h = select_edges(&tall_field(), Direction::Horizontal);
        assert_eq!(h, EdgePair { start: [t1, t2], end: [t0, t3] });
        let v = select_edges(&tall_field(), Direction::Vertical);
        assert_eq!(v, EdgePair { start: [t0, t1], end: [t3, t2] });
    }

    #[test]
    fn test_select_edges_square_uses_else_branch() {
        let square = Rectangle::new([
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(0.0, 5.0),
        ]);
        let [v0, v1, v2, v3] = *square.vertices();
        let h = select_edges(&square, Direction::Horizontal);
        assert_eq!(h.start, [v1, v2]);
        assert_eq!(h.end, [v0, v3]);
    }

    #[test]
    fn test_generate_horizontal_example() {
        let lines = generate(&field(), 2, Direction::Horizontal).unwrap();
        let got: Vec<_> = lines.iter().map(endpoints).collect();
        assert_eq!(
            got,
            vec![
                ((0.0, 0.0), (0.0, 4.0)),
                ((5.0, 0.0), (5.0, 4.0)),
                ((10.0, 0.0), (10.0, 4.0)),
            ]
        );
        let fractions: Vec<_> = lines.iter().map(|t| t.fraction).collect();
        assert_eq!(fractions, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_generate_vertical_example() {
        let lines = generate(&field(), 1, Direction::Vertical).unwrap();
        let got: Vec<_> = lines.iter().map(endpoints).collect();
        assert_eq!(
            got,
            vec![((10.0, 0.0), (0.0, 0.0)), ((10.0, 4.0), (0.0, 4.0))]
        );
    }

    #[test]
    fn test_generate_count_is_line_count_plus_one() {
        for n in [1, 2, 7, 100] {
            let lines = generate(&field(), n, Direction::Vertical).unwrap();
            assert_eq!(lines.len(), n as usize + 1);
            assert!(lines.iter().enumerate().all(|(i, t)| t.index == i));
        }
    }

    #[test]
    fn test_generate_zero_lines_rejected() {
        let err = generate(&field(), 0, Direction::Horizontal).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_generate_uneven_spacing() {
        let lines = generate(&field(), 3, Direction::Horizontal).unwrap();
        assert_relative_eq!(lines[1].start().x, 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(lines[2].end().x, 20.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(lines[1].line.length(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_generator_strict_rejects_skewed_ring() {
        let skewed = Rectangle::new([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(12.0, 4.0),
            Point::new(2.0, 4.0),
        ]);
        assert!(TransectGenerator::new(4).generate(&skewed).is_ok());
        assert!(TransectGenerator::new(4).strict(1e-6).generate(&skewed).is_err());
    }

    #[test]
    fn test_generator_matches_free_function() {
        let a = TransectGenerator::new(5)
            .direction(Direction::Vertical)
            .strict(1e-9)
            .generate(&field())
            .unwrap();
        let b = generate(&field(), 5, Direction::Vertical).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generator_zero_checked_before_strict() {
        let degenerate = Rectangle::new([Point::default(); 4]);
        let err = TransectGenerator::new(0).strict(1e-6).generate(&degenerate).unwrap_err();
        assert!(err.to_string().contains("line count"));
    }
}
