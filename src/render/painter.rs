//! Tile compositing onto the document canvas.
//!
//! The painter turns a [`PaintContext`] and a [`TileStore`] into canvas
//! calls. With split panes active every tile is blitted once per pane it
//! overlaps, cropped to that pane, using `min(pane.min, view.min)` as the
//! pane's canvas origin; otherwise it is blitted once at
//! `tile.position - view.min`.
//!
//! Missing tiles are the steady state while content streams in: they are
//! skipped, or drawn as a checkerboard when the debug overlay is on.

use std::collections::HashSet;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use super::backend::Canvas;
use super::cache::TileStore;
use super::colors::{palette, CssColor};
use super::debug_overlay::{draw_checkerboard, draw_tile_overlay};
use crate::layout::{PageLayoutQuery, PaintContext, ViewportConfig};
use crate::types::{Bounds, Point, Rect, Tile, TileCoordinate, TileRange};

/// Painter settings that are not part of the document model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterOptions {
    /// Only paint once every visible tile is present and fetched.
    pub wait_for_tiles: bool,
    /// Per-tile borders, status swatches, delta histograms and counters.
    pub debug_overlay: bool,
    pub clear_color: CssColor,
    pub document_background_color: CssColor,
    /// Page number font family; the size is 40px times the rounded DPI scale.
    pub page_font_family: String,
}

impl Default for PainterOptions {
    fn default() -> Self {
        Self {
            wait_for_tiles: false,
            debug_overlay: false,
            clear_color: palette::WHITE.to_string(),
            document_background_color: palette::WHITE.to_string(),
            page_font_family: "Arial".to_string(),
        }
    }
}

/// Container state the painter reads once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStatus {
    pub in_zoom_animation: bool,
    /// Zoom changed since the last full paint; the canvas was not cleared.
    pub zoom_changed: bool,
}

/// Everything one paint call draws into and reads from.
pub struct PaintScope<'a, C: Canvas, S: TileStore<C::Image> + ?Sized> {
    pub canvas: &'a mut C,
    pub tiles: &'a S,
    pub config: &'a ViewportConfig,
    pub status: FrameStatus,
}

/// Tile counts of one painted frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub painted: usize,
    pub placeholders: usize,
    pub skipped: usize,
}

/// Result of [`TilePainter::on_draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FrameOutcome {
    /// A zoom animation owns the canvas this frame.
    ZoomAnimation,
    /// Wait-for-tiles mode and the visible set is incomplete.
    WaitingForTiles,
    Painted(FrameReport),
}

/// Whether the last zoom frame hit the document's top-left edge per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoomEdge {
    pub x: bool,
    pub y: bool,
}

/// What to put at a tile's destination.
pub(crate) enum TileSource<'t, B> {
    Tile(&'t Tile<B>),
    Placeholder,
}

impl<B> Clone for TileSource<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for TileSource<'_, B> {}

#[derive(Debug, Clone, Default)]
pub struct TilePainter {
    options: PainterOptions,
    pub(crate) zoom_at_doc_edge: ZoomEdge,
}

impl TilePainter {
    pub fn new(options: PainterOptions) -> Self {
        Self {
            options,
            zoom_at_doc_edge: ZoomEdge::default(),
        }
    }

    pub fn options(&self) -> &PainterOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut PainterOptions {
        &mut self.options
    }

    pub fn zoom_at_doc_edge(&self) -> ZoomEdge {
        self.zoom_at_doc_edge
    }

    /// Draw one tile, e.g. when it arrives outside a frame.
    ///
    /// No-op during a zoom animation, and in wait-for-tiles mode until the
    /// whole visible set is available. Returns whether anything was drawn.
    pub fn paint<C, S>(
        &self,
        scope: &mut PaintScope<'_, C, S>,
        tile: &Tile<C::Image>,
        ctx: &PaintContext,
        is_async: bool,
    ) -> bool
    where
        C: Canvas,
        S: TileStore<C::Image> + ?Sized,
    {
        if scope.status.in_zoom_animation {
            return false;
        }
        if self.options.wait_for_tiles
            && !self.have_all_tiles_in_view::<C::Image, S>(scope.config, ctx, scope.tiles)
        {
            return false;
        }
        self.paint_source(
            scope.canvas,
            scope.config,
            scope.status,
            TileSource::Tile(tile),
            tile.coords,
            ctx,
            is_async,
        );
        true
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn paint_source<C: Canvas>(
        &self,
        canvas: &mut C,
        config: &ViewportConfig,
        status: FrameStatus,
        source: TileSource<'_, C::Image>,
        coords: TileCoordinate,
        ctx: &PaintContext,
        is_async: bool,
    ) {
        let clear = is_async || status.zoom_changed;
        if ctx.pane_bounds_active {
            self.paint_with_panes(canvas, config, source, coords, ctx, clear);
        } else {
            self.paint_simple(canvas, config, source, coords, ctx, clear);
        }
    }

    fn paint_with_panes<C: Canvas>(
        &self,
        canvas: &mut C,
        config: &ViewportConfig,
        source: TileSource<'_, C::Image>,
        coords: TileCoordinate,
        ctx: &PaintContext,
        clear: bool,
    ) {
        let tile_bounds = coords.bounds(ctx.tile_size);
        let view = ctx.view_bounds;

        for pane in &ctx.pane_bounds_list {
            if !pane.intersects(&tile_bounds) {
                continue;
            }
            // In-canvas origin of the pane: frozen panes sit at document
            // origin, scrolled panes share the view's origin.
            let pane_offset = pane.min.min(view.min);
            self.draw_tile_in_pane(canvas, config, source, &tile_bounds, pane, pane_offset, clear);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile_in_pane<C: Canvas>(
        &self,
        canvas: &mut C,
        config: &ViewportConfig,
        source: TileSource<'_, C::Image>,
        tile_bounds: &Bounds,
        pane: &Bounds,
        pane_offset: Point,
        clear: bool,
    ) {
        // Cropping instead of clipping avoids a save/restore per pane.
        let crop = tile_bounds.crop(pane);
        let crop_size = crop.size();
        if crop_size.x <= 0.0 || crop_size.y <= 0.0 {
            return;
        }

        let dst_origin = crop.min - pane_offset;
        let dst = Rect::new(dst_origin.x, dst_origin.y, crop_size.x, crop_size.y);

        if clear {
            canvas.set_fill_style(&self.options.clear_color);
            begin_mirror(canvas, config);
            canvas.fill_rect(dst);
            end_mirror(canvas, config);
        }

        let src_origin = crop.min - tile_bounds.min;
        let src = Rect::new(src_origin.x, src_origin.y, crop_size.x, crop_size.y);

        begin_mirror(canvas, config);
        self.draw_tile_crop(canvas, source, src, dst);
        end_mirror(canvas, config);
    }

    fn paint_simple<C: Canvas>(
        &self,
        canvas: &mut C,
        config: &ViewportConfig,
        source: TileSource<'_, C::Image>,
        coords: TileCoordinate,
        ctx: &PaintContext,
        clear: bool,
    ) {
        let view_min = ctx.view_bounds.min;
        let mut offset = coords.pos() - view_min;
        let size = ctx.tile_size;

        if clear && config.file_based.is_none() {
            // Non-spreadsheet tiles may carry transparent pixels.
            canvas.set_fill_style(&self.options.clear_color);
            canvas.fill_rect(Rect::new(offset.x, offset.y, size.x, size.y));
        }

        if let Some(layout) = &config.file_based {
            offset.y = f64::from(coords.part) * layout.part_stride() + coords.pos().y - view_min.y;
        }

        let src = Rect::new(0.0, 0.0, size.x, size.y);
        let dst = Rect::new(offset.x, offset.y, size.x, size.y);
        self.draw_tile_crop(canvas, source, src, dst);
    }

    /// Blit `src` of the tile bitmap into `dst`, then the debug overlay.
    pub(crate) fn draw_tile_crop<C: Canvas>(
        &self,
        canvas: &mut C,
        source: TileSource<'_, C::Image>,
        src: Rect,
        dst: Rect,
    ) {
        match source {
            TileSource::Tile(tile) => {
                match &tile.bitmap {
                    Some(bitmap) => {
                        if let Err(e) = canvas.draw_image(bitmap, src, dst) {
                            tracing::warn!(tile = %tile.coords, error = %e, "tile blit failed");
                        }
                    }
                    None => draw_checkerboard(canvas, src, dst),
                }
                if self.options.debug_overlay {
                    draw_tile_overlay(canvas, tile, src, dst);
                }
            }
            TileSource::Placeholder => draw_checkerboard(canvas, src, dst),
        }
    }

    /// Visit every tile coordinate intersecting the panes of `ctx`, each
    /// exactly once, until `f` breaks.
    ///
    /// File-based views enumerate the coordinates of the visible pages
    /// instead of a document grid.
    pub fn for_each_tile_in_view<'s, B, S, F>(
        config: &ViewportConfig,
        ctx: &PaintContext,
        zoom: i32,
        part: i32,
        mode: i32,
        tiles: &'s S,
        mut f: F,
    ) where
        S: TileStore<B> + ?Sized,
        B: 's,
        F: FnMut(Option<&'s Tile<B>>, TileCoordinate) -> ControlFlow<()>,
    {
        let mut seen = HashSet::new();
        let mut visit = |coords: TileCoordinate| -> ControlFlow<()> {
            if !seen.insert(coords) {
                return ControlFlow::Continue(());
            }
            f(tiles.get(&coords), coords)
        };

        if let Some(layout) = &config.file_based {
            for coords in layout.visible_coordinates(&ctx.view_bounds, ctx.tile_size.x, zoom, mode) {
                if visit(coords).is_break() {
                    return;
                }
            }
            return;
        }

        for pane in &ctx.pane_bounds_list {
            let range = TileRange::from_bounds(pane, ctx.tile_size);
            for (i, j) in range.iter() {
                let Some(coords) = TileCoordinate::from_index(i, j, ctx.tile_size, zoom, part, mode)
                else {
                    continue;
                };
                if visit(coords).is_break() {
                    return;
                }
            }
        }
    }

    /// False at the first visible tile that is missing or needs a fetch.
    pub fn have_all_tiles_in_view<B, S>(&self, config: &ViewportConfig, ctx: &PaintContext, tiles: &S) -> bool
    where
        S: TileStore<B> + ?Sized,
    {
        let mut complete = true;
        Self::for_each_tile_in_view(config, ctx, config.zoom, config.part, config.mode, tiles, |tile, _| {
            if tile.is_none_or(Tile::needs_fetch) {
                complete = false;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });
        complete
    }

    /// Per-frame entry point.
    ///
    /// Tiles outside `subset` (document core pixels) are skipped when given.
    pub fn on_draw<C, S>(
        &self,
        scope: &mut PaintScope<'_, C, S>,
        ctx: &PaintContext,
        subset: Option<&Bounds>,
    ) -> FrameOutcome
    where
        C: Canvas,
        S: TileStore<C::Image> + ?Sized,
    {
        if scope.status.in_zoom_animation {
            return FrameOutcome::ZoomAnimation;
        }

        let canvas: &mut C = scope.canvas;
        let (config, status, tiles) = (scope.config, scope.status, scope.tiles);

        if self.options.wait_for_tiles {
            if !self.have_all_tiles_in_view::<C::Image, S>(config, ctx, tiles) {
                tracing::trace!("waiting for tiles");
                return FrameOutcome::WaitingForTiles;
            }
        } else if !status.zoom_changed {
            // Page borders and numbers stay hidden right after a zoom.
            self.draw_page_backgrounds(canvas, config, ctx);
        }

        let debug = self.options.debug_overlay;
        let mut report = FrameReport::default();
        Self::for_each_tile_in_view(config, ctx, config.zoom, config.part, config.mode, tiles, |tile, coords| {
            let outside_subset =
                subset.is_some_and(|s| !s.intersects(&coords.bounds(ctx.tile_size)));
            if outside_subset || !config.is_valid_tile(&coords) {
                report.skipped += 1;
                return ControlFlow::Continue(());
            }
            match tile {
                Some(tile) if tile.is_ready_to_draw() || debug => {
                    self.paint_source(canvas, config, status, TileSource::Tile(tile), coords, ctx, false);
                    report.painted += 1;
                }
                None if debug => {
                    self.paint_source(canvas, config, status, TileSource::Placeholder, coords, ctx, false);
                    report.placeholders += 1;
                }
                _ => report.skipped += 1,
            }
            ControlFlow::Continue(())
        });

        tracing::trace!(
            painted = report.painted,
            placeholders = report.placeholders,
            skipped = report.skipped,
            "tiles painted"
        );
        FrameOutcome::Painted(report)
    }

    /// Union of the document bounds of `coords`; `None` for an empty set or
    /// a file-based view.
    pub fn subset_bounds<'c, I>(config: &ViewportConfig, coords: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'c TileCoordinate>,
    {
        if config.file_based.is_some() {
            return None;
        }
        let tile_size = config.tile_size_point();
        coords
            .into_iter()
            .map(|c| c.bounds(tile_size))
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Right-to-left spreadsheets mirror tile blits around the canvas centre.
pub(crate) fn begin_mirror<C: Canvas>(canvas: &mut C, config: &ViewportConfig) {
    if config.mirror_tiles() {
        canvas.save();
        let width = canvas.width();
        canvas.translate(width, 0.0);
        canvas.scale(-1.0, 1.0);
    }
}

pub(crate) fn end_mirror<C: Canvas>(canvas: &mut C, config: &ViewportConfig) {
    if config.mirror_tiles() {
        canvas.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DocType;
    use crate::render::{MemoryTileStore, RecordingCanvas};

    fn spreadsheet() -> ViewportConfig {
        ViewportConfig {
            doc_type: DocType::Spreadsheet,
            document_size: Point::new(5000.0, 5000.0),
            split_pos: Point::new(100.0, 100.0),
            ..ViewportConfig::default()
        }
    }

    #[test]
    fn test_overlapping_panes_visit_each_tile_once() {
        let config = spreadsheet();
        // View at the origin makes every pane overlap the first tile row.
        let ctx = PaintContext::new(&config, Point::ZERO, Point::new(600.0, 600.0), Point::new(600.0, 600.0), None);
        let store: MemoryTileStore<u64> = MemoryTileStore::new(8);
        let mut visited = Vec::new();
        TilePainter::for_each_tile_in_view(&config, &ctx, 10, 0, 0, &store, |_, c| {
            visited.push(c);
            ControlFlow::Continue(())
        });
        let unique: HashSet<_> = visited.iter().copied().collect();
        assert_eq!(unique.len(), visited.len());
        assert_eq!(visited.len(), 9);
    }

    #[test]
    fn test_break_stops_enumeration() {
        let config = ViewportConfig::default();
        let ctx = PaintContext::new(&config, Point::ZERO, Point::new(600.0, 600.0), Point::new(600.0, 600.0), None);
        let store: MemoryTileStore<u64> = MemoryTileStore::new(8);
        let mut calls = 0;
        TilePainter::for_each_tile_in_view(&config, &ctx, 10, 0, 0, &store, |_, _| {
            calls += 1;
            ControlFlow::Break(())
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_rtl_spreadsheet_mirrors_blits() {
        let config = ViewportConfig {
            rtl: true,
            split_pos: Point::ZERO,
            ..spreadsheet()
        };
        let ctx = PaintContext::new(&config, Point::ZERO, Point::new(300.0, 300.0), Point::new(300.0, 300.0), None);
        let tile = Tile::ready(TileCoordinate::new(0, 0, 10, 0, 0), 1_u64);
        let store: MemoryTileStore<u64> = MemoryTileStore::new(1);
        let mut canvas = RecordingCanvas::new(300.0, 300.0);
        let mut scope = PaintScope {
            canvas: &mut canvas,
            tiles: &store,
            config: &config,
            status: FrameStatus::default(),
        };
        assert!(TilePainter::default().paint(&mut scope, &tile, &ctx, false));
        let ops = canvas.ops();
        assert!(ops.contains(&crate::render::DrawOp::Translate { x: 300.0, y: 0.0 }));
        assert!(ops.contains(&crate::render::DrawOp::Scale { x: -1.0, y: 1.0 }));
    }

    #[test]
    fn test_subset_bounds_union() {
        let config = ViewportConfig::default();
        let coords = [
            TileCoordinate::new(0, 0, 10, 0, 0),
            TileCoordinate::new(512, 256, 10, 0, 0),
        ];
        let bounds = TilePainter::subset_bounds(&config, &coords);
        assert_eq!(
            bounds,
            Some(Bounds::new(Point::ZERO, Point::new(768.0, 512.0)))
        );
        assert_eq!(TilePainter::subset_bounds(&config, &[]), None);
    }
}
