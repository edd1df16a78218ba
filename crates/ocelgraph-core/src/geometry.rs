//! Geometric primitives for graph layout and positioning.
//!
//! This module provides the geometric types used throughout ocelgraph for
//! calculating node positions, sizes, and the bounding box of a laid-out graph.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in graph space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! ocelgraph uses a coordinate system consistent with SVG and most UI toolkits:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Layout engines report node centers; the normalizer converts them into
//! top-left corners inside a frame whose minimum coordinate is zero.

use serde::Serialize;

/// A point in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Swaps the x and y coordinates
    pub fn transpose(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns half of this size as a point offset, i.e. the vector from the
    /// top-left corner to the center
    pub fn half_extent(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Swaps width and height
    pub fn transpose(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds of the given size whose top-left corner is `top_left`
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Merges two bounds to create a larger bounds that contains both
    ///
    /// The resulting bounds will have the minimum values of both bounds for min_x and min_y,
    /// and the maximum values of both bounds for max_x and max_y.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);

        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_midpoint() {
        let midpoint = Point::new(0.0, 0.0).midpoint(Point::new(4.0, 6.0));
        assert_approx_eq!(f32, midpoint.x(), 2.0);
        assert_approx_eq!(f32, midpoint.y(), 3.0);
    }

    #[test]
    fn test_transpose() {
        assert_eq!(Point::new(1.0, 2.0).transpose(), Point::new(2.0, 1.0));
        assert_eq!(Size::new(200.0, 100.0).transpose(), Size::new(100.0, 200.0));
    }

    #[test]
    fn test_size_half_extent() {
        let half = Size::new(200.0, 100.0).half_extent();
        assert_approx_eq!(f32, half.x(), 100.0);
        assert_approx_eq!(f32, half.y(), 50.0);
    }

    #[test]
    fn test_bounds_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(30.0, 40.0));

        assert_eq!(bounds.min_point(), Point::new(10.0, 20.0));
        assert_approx_eq!(f32, bounds.width(), 30.0);
        assert_approx_eq!(f32, bounds.height(), 40.0);
        assert_approx_eq!(f32, bounds.max_x(), 40.0);
        assert_approx_eq!(f32, bounds.max_y(), 60.0);
    }

    #[test]
    fn test_bounds_merge() {
        let b1 = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b2 = Bounds::new_from_top_left(Point::new(-5.0, 20.0), Size::new(10.0, 10.0));
        let merged = b1.merge(&b2);

        assert_approx_eq!(f32, merged.min_x(), -5.0);
        assert_approx_eq!(f32, merged.min_y(), 0.0);
        assert_approx_eq!(f32, merged.max_x(), 10.0);
        assert_approx_eq!(f32, merged.max_y(), 30.0);
    }

}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Merged bounds contain both inputs.
    fn check_bounds_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);

        for bounds in [b1, b2] {
            prop_assert!(merged.min_x() <= bounds.min_x());
            prop_assert!(merged.min_y() <= bounds.min_y());
            prop_assert!(merged.max_x() >= bounds.max_x());
            prop_assert!(merged.max_y() >= bounds.max_y());
        }
        Ok(())
    }

    /// Bounds merge should be commutative: a.merge(b) == b.merge(a).
    fn check_bounds_merge_is_commutative(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged1 = b1.merge(&b2);
        let merged2 = b2.merge(&b1);

        prop_assert!(approx_eq!(f32, merged1.min_x(), merged2.min_x()));
        prop_assert!(approx_eq!(f32, merged1.min_y(), merged2.min_y()));
        prop_assert!(approx_eq!(f32, merged1.max_x(), merged2.max_x()));
        prop_assert!(approx_eq!(f32, merged1.max_y(), merged2.max_y()));
        Ok(())
    }

    /// Adding then subtracting a point should return the original.
    fn check_add_sub_inverse(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let result = p1.add_point(p2).sub_point(p2);

        prop_assert!(approx_eq!(f32, result.x(), p1.x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, result.y(), p1.y(), epsilon = 0.001));
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_merge_is_commutative(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_is_commutative(b1, b2)?;
        }

        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn add_sub_inverse(p1 in point_strategy(), p2 in point_strategy()) {
            check_add_sub_inverse(p1, p2)?;
        }
    }
}
