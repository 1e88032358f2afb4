//! Points, bounds and rectangles in core (device) pixels.
//!
//! `Bounds` is min/max based and is what tiles and panes are expressed in;
//! `Rect` is origin/size based and is what canvas calls take.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// A 2D point or size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn is_zero(self) -> bool {
        is_zero(self.x) && is_zero(self.y)
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Axis-aligned bounds given by their min and max corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Point, size: Point) -> Self {
        Self::new(origin, origin + size)
    }

    pub fn size(&self) -> Point {
        self.max - self.min
    }

    pub fn round(&self) -> Self {
        Self::new(self.min.round(), self.max.round())
    }

    /// Inclusive overlap test: bounds sharing only an edge intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        other.max.x >= self.min.x
            && other.min.x <= self.max.x
            && other.max.y >= self.min.y
            && other.min.y <= self.max.y
    }

    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// The overlapping region. May be inverted when the bounds are disjoint;
    /// callers check the size before using it.
    pub fn crop(&self, other: &Self) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Smallest bounds covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn to_rect(&self) -> Rect {
        let size = self.size();
        Rect::new(self.min.x, self.min.y, size.x, size.y)
    }
}

/// Origin/size rectangle as taken by canvas calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn to_bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.origin(), Point::new(self.width, self.height))
    }
}

/// Inclusive range of tile indices along both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl TileRange {
    /// Tile indices touched by `bounds`. A max edge lying exactly on a tile
    /// boundary includes the following tile.
    pub fn from_bounds(bounds: &Bounds, tile_size: Point) -> Self {
        if tile_size.x <= 0.0 || tile_size.y <= 0.0 {
            return Self::empty();
        }
        Self {
            min_x: floor_i64(bounds.min.x / tile_size.x),
            min_y: floor_i64(bounds.min.y / tile_size.y),
            max_x: floor_i64(bounds.max.x / tile_size.x),
            max_y: floor_i64(bounds.max.y / tile_size.y),
        }
    }

    pub const fn empty() -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: -1,
            max_y: -1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Row-major iteration over `(i, j)` index pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y).flat_map(move |j| (min_x..=max_x).map(move |i| (i, j)))
    }
}

/// Fraction of `tile`'s area that lies inside `view`.
///
/// Degenerate tile bounds and disjoint rectangles give 0, containment gives 1.
pub fn tile_intersection_area_fraction(tile: &Bounds, view: &Bounds) -> f64 {
    let size = tile.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return 0.0;
    }
    let inter = tile.crop(view).size();
    inter.x.max(0.0) * inter.y.max(0.0) / (size.x * size.y)
}

/// Tolerant zero test for values that went through float arithmetic.
pub fn is_zero(v: f64) -> bool {
    v.abs() < f64::EPSILON
}

/// Round to the nearest integer, saturating at the `i64` range.
#[allow(clippy::cast_possible_truncation)] // `as` saturates; inputs are pixel or score magnitudes
pub fn round_i64(v: f64) -> i64 {
    v.round() as i64
}

#[allow(clippy::cast_possible_truncation)] // `as` saturates; inputs are tile indices
fn floor_i64(v: f64) -> i64 {
    v.floor() as i64
}
