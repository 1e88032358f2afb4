//! Interpolated frames of a pinch or wheel zoom animation.
//!
//! While the zoom animates no tiles exist for the in-between scales, so each
//! frame rescales the tiles already cached. Zooming out prefers whichever
//! pyramid level covers the frame best, so the edges that come into view
//! show coarser content instead of blank canvas.

use super::backend::Canvas;
use super::cache::TileStore;
use super::painter::{begin_mirror, end_mirror, PaintScope, TilePainter, TileSource};
use crate::layout::zoom::{scale_zoom, zoom_scale, zoom_to_factor, DEFAULT_ZOOM};
use crate::layout::{
    max_pane_min, pane_freeze, PageLayoutQuery, PaintContext, PaneFreeze, ViewportConfig, ZoomFrame,
};
use crate::types::{
    is_zero, round_i64, tile_intersection_area_fraction, Bounds, Point, Rect, Tile, TileCoordinate,
    TileRange,
};

/// Document position of one pane in a zoom frame, in core pixels at the
/// current zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomDocPos {
    pub top_left: Point,
    /// Centre of the free pane, projected to the frame's zoom.
    pub center: Option<Point>,
}

impl TilePainter {
    /// Render one frame of a zoom animation from the cached tiles.
    ///
    /// Returns false when `ctx` carries no usable zoom frame.
    pub fn draw_zoom_frame<C, S>(&mut self, scope: &mut PaintScope<'_, C, S>, ctx: &PaintContext) -> bool
    where
        C: Canvas,
        S: TileStore<C::Image> + ?Sized,
    {
        let Some(frame) = ctx.zoom_frame else {
            return false;
        };
        if frame.scale.is_nan() || frame.scale <= 0.0 {
            return false;
        }

        let canvas: &mut C = scope.canvas;
        let (config, tiles) = (scope.config, scope.tiles);
        let zoom = config.zoom;
        let split = ctx.split_pos;
        let scale = frame.scale;

        let view_size = ctx.view_bounds.size();
        canvas.set_fill_style(&self.options().clear_color);
        canvas.fill_rect(Rect::new(0.0, 0.0, view_size.x, view_size.y));

        let max_min = max_pane_min(&ctx.pane_bounds_list);
        for pane in &ctx.pane_bounds_list {
            let pane_size = pane.size();
            let mut dest_pos = Point::ZERO;
            let mut doc_area = pane_size / scale;
            let freeze = pane_freeze(pane, max_min);

            if freeze.freeze_x {
                doc_area.x = pane_size.x;
            } else {
                dest_pos.x = split.x;
                doc_area.x += split.x / scale;
            }
            if freeze.freeze_y {
                doc_area.y = pane_size.y;
            } else {
                dest_pos.y = split.y;
                doc_area.y += split.y / scale;
            }

            let pos = Self::zoom_doc_pos(config, &frame, pane, freeze, split, false);
            if !freeze.freeze_x {
                self.zoom_at_doc_edge.x = is_zero(pos.top_left.x - split.x);
            }
            if !freeze.freeze_y {
                self.zoom_at_doc_edge.y = is_zero(pos.top_left.y - split.y);
            }

            let doc_range = Bounds::from_origin_size(pos.top_left, doc_area);
            let source_zoom = if scale < 1.0 {
                Self::best_zoom_level::<C::Image, S>(config, ctx, tiles, &doc_range, zoom, scale)
            } else {
                zoom
            };

            let (range, dest, rel_scale) = if source_zoom == zoom {
                (doc_range, dest_pos, 1.0)
            } else {
                let conv = zoom_scale(f64::from(source_zoom), f64::from(zoom));
                (scale_bounds(&doc_range, conv), dest_pos * conv, conv)
            };
            let range_origin = range.min - dest;

            begin_mirror(canvas, config);
            for_each_tile_in_area::<C::Image, S, _>(config, ctx, tiles, &range, source_zoom, |tile, coords| {
                if !tile.is_ready_to_draw() || !config.is_valid_tile(&coords) {
                    return;
                }
                let tile_bounds = Bounds::from_origin_size(tile_pos(config, &coords, rel_scale), ctx.tile_size);
                let crop = range.crop(&tile_bounds);
                let crop_size = crop.size();
                if crop_size.x <= 0.0 || crop_size.y <= 0.0 {
                    return;
                }
                let tile_offset = crop.min - tile_bounds.min;
                let pane_offset = crop.min - range_origin;
                let src = Rect::new(tile_offset.x, tile_offset.y, crop_size.x, crop_size.y);
                // Whole-pixel destinations plus the half-pixel correction
                // keep seams out of non-Chromium renderers.
                let dst = Rect::new(
                    (pane_offset.x / rel_scale * scale).floor() + 0.5,
                    (pane_offset.y / rel_scale * scale).floor() + 0.5,
                    (crop_size.x / rel_scale * scale).floor() + 1.5,
                    (crop_size.y / rel_scale * scale).floor() + 1.5,
                );
                self.draw_tile_crop(canvas, TileSource::Tile(tile), src, dst);
            });
            end_mirror(canvas, config);
        }
        true
    }

    /// Zoom level whose cached tiles cover `area` (core pixels at
    /// `area_zoom`) best.
    ///
    /// Scores are the summed tile coverage fractions, scaled to `max_zoom`
    /// resolution so levels compare fairly; a level without tiles scores
    /// lowest. Ties go to the level nearer the frame's natural target zoom.
    pub fn best_zoom_level<B, S>(
        config: &ViewportConfig,
        ctx: &PaintContext,
        tiles: &S,
        area: &Bounds,
        area_zoom: i32,
        frame_scale: f64,
    ) -> i32
    where
        S: TileStore<B> + ?Sized,
    {
        let target = i32::try_from(round_i64(scale_zoom(frame_scale, f64::from(area_zoom))))
            .unwrap_or(area_zoom);
        let mut best_zoom = target;
        let mut best_score: Option<i64> = None;
        let area = Bounds::new(area.min.max(Point::ZERO), area.max);

        for zoom in config.min_zoom..=config.max_zoom {
            let correction = zoom_to_factor(f64::from(config.max_zoom - zoom) + DEFAULT_ZOOM);
            let rel_scale = zoom_scale(f64::from(zoom), f64::from(area_zoom));
            let area_at_zoom = scale_bounds(&area, rel_scale);

            let mut coverage = 0.0;
            let mut has_tiles = false;
            for_each_tile_in_area::<B, S, _>(config, ctx, tiles, &area_at_zoom, zoom, |tile, coords| {
                if tile.bitmap.is_none() {
                    return;
                }
                let bounds = Bounds::from_origin_size(tile_pos(config, &coords, rel_scale), ctx.tile_size);
                coverage += tile_intersection_area_fraction(&bounds, &area_at_zoom);
                has_tiles = true;
            });

            let score = has_tiles.then(|| round_i64(coverage * correction * correction / 10.0));
            let nearer = (target - zoom).abs() < (target - best_zoom).abs();
            if score > best_score || (score == best_score && nearer) {
                best_score = score;
                best_zoom = zoom;
            }
        }

        tracing::debug!(target_zoom = target, best_zoom, score = ?best_score, "zoom frame source level");
        best_zoom
    }

    /// Top-left of the document area `pane` shows in the zoom frame.
    ///
    /// Free axes follow the pinch around the point it started at; frozen
    /// axes stay at the pane's own origin. Non-spreadsheet documents may
    /// scroll into their side margins, so their x axis has no lower bound.
    pub fn zoom_doc_pos(
        config: &ViewportConfig,
        frame: &ZoomFrame,
        pane: &Bounds,
        freeze: PaneFreeze,
        split: Point,
        find_free_pane_center: bool,
    ) -> ZoomDocPos {
        let x_min = if !config.is_spreadsheet() {
            f64::NEG_INFINITY
        } else if pane.min.x > 0.0 {
            split.x
        } else {
            0.0
        };
        let y_min = if pane.min.y < 0.0 {
            f64::NEG_INFINITY
        } else if pane.min.y > 0.0 {
            split.y
        } else {
            0.0
        };

        let scale = frame.scale;
        let pane_size = pane.size();
        let start = frame.pinch_start_center;
        let center_offset = frame.new_center - start;
        let portion = |p: f64, min: f64, size: f64| if size > 0.0 { (p - min) / size } else { 0.0 };
        let portion_x = portion(start.x, pane.min.x, pane_size.x);
        let portion_y = portion(start.y, pane.min.y, pane_size.y);

        let mut top_left = Point::new(
            x_min.max(start.x + (center_offset.x - pane_size.x * portion_x) / scale),
            y_min.max(start.y + (center_offset.y - pane_size.y * portion_y) / scale),
        );
        if freeze.freeze_x {
            top_left.x = pane.min.x;
        }
        if freeze.freeze_y {
            top_left.y = pane.min.y;
        }

        let center = find_free_pane_center.then(|| {
            Point::new(
                top_left.x - split.x + (pane_size.x + split.x) * 0.5 / scale,
                top_left.y - split.y + (pane_size.y + split.y) * 0.5 / scale,
            ) * scale
        });

        ZoomDocPos { top_left, center }
    }

    /// Centre of the free pane once the zoom in `ctx` completes, in core
    /// pixels at the target zoom.
    pub fn zoom_map_center(config: &ViewportConfig, ctx: &PaintContext) -> Option<Point> {
        let frame = ctx.zoom_frame?;
        if frame.scale.is_nan() || frame.scale <= 0.0 {
            return None;
        }
        let free_pane = Bounds::new(ctx.view_bounds.min + ctx.split_pos, ctx.view_bounds.max);
        Self::zoom_doc_pos(config, &frame, &free_pane, PaneFreeze::default(), ctx.split_pos, true).center
    }
}

/// Call `f` for every present tile at `zoom` intersecting `area`.
fn for_each_tile_in_area<'s, B, S, F>(
    config: &ViewportConfig,
    ctx: &PaintContext,
    tiles: &'s S,
    area: &Bounds,
    zoom: i32,
    mut f: F,
) where
    S: TileStore<B> + ?Sized,
    B: 's,
    F: FnMut(&'s Tile<B>, TileCoordinate),
{
    let (part, mode) = (config.part, config.mode);
    if let Some(layout) = &config.file_based {
        for coords in layout.visible_coordinates(area, ctx.tile_size.x, zoom, mode) {
            if let Some(tile) = tiles.get(&coords) {
                f(tile, coords);
            }
        }
        return;
    }

    for (i, j) in TileRange::from_bounds(area, ctx.tile_size).iter() {
        let Some(coords) = TileCoordinate::from_index(i, j, ctx.tile_size, zoom, part, mode) else {
            continue;
        };
        if let Some(tile) = tiles.get(&coords) {
            f(tile, coords);
        }
    }
}

/// Document position of a tile; file-based tiles are offset by their part.
fn tile_pos(config: &ViewportConfig, coords: &TileCoordinate, rel_scale: f64) -> Point {
    let mut pos = coords.pos();
    if let Some(layout) = &config.file_based {
        let stride = ((layout.part_height + layout.gap) * rel_scale).round();
        pos.y += f64::from(coords.part) * stride;
    }
    pos
}

fn scale_bounds(bounds: &Bounds, scale: f64) -> Bounds {
    Bounds::new(bounds.min * scale, bounds.max * scale)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::layout::DocType;

    fn frame(scale: f64, center: Point) -> ZoomFrame {
        ZoomFrame {
            scale,
            new_center: center,
            pinch_start_center: center,
        }
    }

    #[test]
    fn test_doc_pos_keeps_pinch_point_fixed() {
        let config = ViewportConfig::default();
        let pane = Bounds::new(Point::new(0.0, 0.0), Point::new(800.0, 600.0));
        let pos = TilePainter::zoom_doc_pos(
            &config,
            &frame(2.0, Point::new(400.0, 300.0)),
            &pane,
            PaneFreeze::default(),
            Point::ZERO,
            false,
        );
        // Half the area on each side of the fixed pinch point.
        assert_eq!(pos.top_left, Point::new(200.0, 150.0));
        assert_eq!(pos.center, None);
    }

    #[test]
    fn test_doc_pos_clamps_spreadsheet_to_origin() {
        let config = ViewportConfig {
            doc_type: DocType::Spreadsheet,
            ..ViewportConfig::default()
        };
        let pane = Bounds::new(Point::ZERO, Point::new(800.0, 600.0));
        let pos = TilePainter::zoom_doc_pos(
            &config,
            &frame(0.5, Point::new(100.0, 100.0)),
            &pane,
            PaneFreeze::default(),
            Point::ZERO,
            false,
        );
        assert_eq!(pos.top_left, Point::ZERO);

        // Text documents may show their side margin.
        let text = TilePainter::zoom_doc_pos(
            &ViewportConfig::default(),
            &frame(0.5, Point::new(100.0, 100.0)),
            &pane,
            PaneFreeze::default(),
            Point::ZERO,
            false,
        );
        assert!(text.top_left.x < 0.0);
        assert_eq!(text.top_left.y, 0.0);
    }

    #[test]
    fn test_frozen_axes_pin_to_pane_origin() {
        let config = ViewportConfig {
            doc_type: DocType::Spreadsheet,
            ..ViewportConfig::default()
        };
        let pane = Bounds::new(Point::new(0.0, 900.0), Point::new(100.0, 1500.0));
        let pos = TilePainter::zoom_doc_pos(
            &config,
            &frame(2.0, Point::new(600.0, 1200.0)),
            &pane,
            PaneFreeze {
                freeze_x: true,
                freeze_y: false,
            },
            Point::new(100.0, 0.0),
            true,
        );
        assert_eq!(pos.top_left.x, 0.0);
        assert!(pos.center.is_some());
    }
}
