use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{round_i64, Bounds, Point};
use crate::layout::zoom::zoom_to_factor;

/// Identifies one tile across zoom levels and document parts.
///
/// `x`/`y` are tile-aligned document pixels at `zoom`. The key is stable
/// under pan and changes with zoom, part or mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoordinate {
    pub x: i64,
    pub y: i64,
    pub zoom: i32,
    /// Sheet, slide or page index.
    pub part: i32,
    /// Part-specific view mode (e.g. notes view).
    #[serde(default)]
    pub mode: i32,
}

impl TileCoordinate {
    pub const fn new(x: i64, y: i64, zoom: i32, part: i32, mode: i32) -> Self {
        Self {
            x,
            y,
            zoom,
            part,
            mode,
        }
    }

    /// Coordinate of tile `(i, j)` on a grid of `tile_size` tiles.
    ///
    /// `None` when the pixel offset overflows.
    pub fn from_index(
        i: i64,
        j: i64,
        tile_size: Point,
        zoom: i32,
        part: i32,
        mode: i32,
    ) -> Option<Self> {
        let x = i.checked_mul(round_i64(tile_size.x))?;
        let y = j.checked_mul(round_i64(tile_size.y))?;
        Some(Self::new(x, y, zoom, part, mode))
    }

    /// Canonical key, `"x:y:zoom:part:mode"`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Parse a key produced by [`TileCoordinate::key`].
    pub fn from_key(key: &str) -> Option<Self> {
        let mut fields = key.split(':').map(str::parse::<i64>);
        let x = fields.next()?.ok()?;
        let y = fields.next()?.ok()?;
        let zoom = i32::try_from(fields.next()?.ok()?).ok()?;
        let part = i32::try_from(fields.next()?.ok()?).ok()?;
        let mode = i32::try_from(fields.next()?.ok()?).ok()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self::new(x, y, zoom, part, mode))
    }

    #[allow(clippy::cast_precision_loss)] // tile offsets stay far below 2^52
    pub fn pos(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    pub fn bounds(&self, tile_size: Point) -> Bounds {
        Bounds::from_origin_size(self.pos(), tile_size)
    }

    /// Scale of this tile's zoom relative to the default zoom, to 3 decimals.
    pub fn scale(&self) -> f64 {
        (zoom_to_factor(f64::from(self.zoom)) * 1000.0).round() / 1000.0
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.x, self.y, self.zoom, self.part, self.mode
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_key_round_trip() {
        let coords = TileCoordinate::new(512, -256, 7, 2, 1);
        assert_eq!(coords.key(), "512:-256:7:2:1");
        assert_eq!(TileCoordinate::from_key(&coords.key()), Some(coords));
    }

    #[test]
    fn test_from_key_rejects_garbage() {
        assert_eq!(TileCoordinate::from_key("1:2:3:4"), None);
        assert_eq!(TileCoordinate::from_key("1:2:3:4:5:6"), None);
        assert_eq!(TileCoordinate::from_key("a:2:3:4:5"), None);
    }

    #[test]
    fn test_from_index_multiplies_tile_size() {
        let tile = Point::new(256.0, 256.0);
        assert_eq!(
            TileCoordinate::from_index(2, -1, tile, 10, 0, 0),
            Some(TileCoordinate::new(512, -256, 10, 0, 0))
        );
        assert_eq!(TileCoordinate::from_index(i64::MAX, 0, tile, 10, 0, 0), None);
    }

    #[test]
    fn test_scale_relative_to_default_zoom() {
        assert_eq!(TileCoordinate::new(0, 0, 10, 0, 0).scale(), 1.0);
        assert_eq!(TileCoordinate::new(0, 0, 11, 0, 0).scale(), 1.2);
        assert_eq!(TileCoordinate::new(0, 0, 9, 0, 0).scale(), 0.833);
    }
}
