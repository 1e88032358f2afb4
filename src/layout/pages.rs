//! Tile enumeration for file-based (PDF-like) views.

use crate::types::{Bounds, Point, TileCoordinate, TileRange};

use super::config::FileBasedLayout;

/// Coordinates the painter should visit for a page-stacked document.
///
/// Tiles of a file-based view are addressed per part, so the plain
/// document-grid walk does not apply.
pub trait PageLayoutQuery {
    /// Tile coordinates covering `area` (document core pixels) at `zoom`.
    fn visible_coordinates(&self, area: &Bounds, tile_size: f64, zoom: i32, mode: i32)
        -> Vec<TileCoordinate>;
}

impl FileBasedLayout {
    /// Indices of the first and last parts intersecting `[top, bottom]`.
    pub fn visible_parts(&self, top: f64, bottom: f64) -> Option<(i64, i64)> {
        let stride = self.part_stride();
        if stride <= 0.0 || self.parts == 0 || bottom < 0.0 {
            return None;
        }
        let last_part = i64::from(self.parts) - 1;
        let first = floor_part(top.max(0.0) / stride).min(last_part);
        let last = floor_part(bottom / stride).min(last_part);
        Some((first, last))
    }
}

impl PageLayoutQuery for FileBasedLayout {
    fn visible_coordinates(
        &self,
        area: &Bounds,
        tile_size: f64,
        zoom: i32,
        mode: i32,
    ) -> Vec<TileCoordinate> {
        let Some((first, last)) = self.visible_parts(area.min.y, area.max.y) else {
            return Vec::new();
        };
        let stride = self.part_stride();
        let tile = Point::new(tile_size, tile_size);
        let mut coords = Vec::new();

        for part in first..=last {
            #[allow(clippy::cast_precision_loss)] // part counts are small
            let part_top = part as f64 * stride;
            // Area in the part's own coordinate space, clamped to the page.
            let local = Bounds::new(
                Point::new(area.min.x.max(0.0), (area.min.y - part_top).max(0.0)),
                Point::new(
                    area.max.x.min(self.part_width),
                    (area.max.y - part_top).min(self.part_height),
                ),
            );
            if local.max.x < local.min.x || local.max.y < local.min.y {
                continue;
            }
            let Ok(part) = i32::try_from(part) else {
                continue;
            };
            coords.extend(
                TileRange::from_bounds(&local, tile)
                    .iter()
                    .filter_map(|(i, j)| TileCoordinate::from_index(i, j, tile, zoom, part, mode)),
            );
        }
        coords
    }
}

#[allow(clippy::cast_possible_truncation)] // saturating; inputs are part indices
fn floor_part(v: f64) -> i64 {
    v.floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FileBasedLayout {
        FileBasedLayout {
            part_width: 500.0,
            part_height: 700.0,
            gap: 20.0,
            parts: 3,
        }
    }

    #[test]
    fn test_visible_parts_spans_gap() {
        assert_eq!(layout().visible_parts(0.0, 600.0), Some((0, 0)));
        assert_eq!(layout().visible_parts(600.0, 800.0), Some((0, 1)));
        assert_eq!(layout().visible_parts(1500.0, 99_999.0), Some((2, 2)));
        assert_eq!(layout().visible_parts(-50.0, -10.0), None);
    }

    #[test]
    fn test_coordinates_are_per_part() {
        let area = Bounds::new(Point::new(0.0, 650.0), Point::new(300.0, 800.0));
        let coords = layout().visible_coordinates(&area, 256.0, 10, 0);
        assert!(coords.iter().any(|c| c.part == 0 && c.y == 512));
        assert!(coords.iter().any(|c| c.part == 1 && c.y == 0));
        assert!(coords.iter().all(|c| c.x <= 256));
    }

    #[test]
    fn test_empty_layout_has_no_coordinates() {
        let empty = FileBasedLayout {
            parts: 0,
            ..layout()
        };
        let area = Bounds::new(Point::ZERO, Point::new(100.0, 100.0));
        assert!(empty.visible_coordinates(&area, 256.0, 10, 0).is_empty());
    }
}
