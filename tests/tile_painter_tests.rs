//! Tile painter tests
//!
//! Pane compositing, missing tiles, wait-for-tiles and the debug overlay,
//! checked against the recorded canvas calls.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{canvas, context_at, grid_store, spreadsheet_config, store_with, text_config};
use tileview::layout::FileBasedLayout;
use tileview::render::{
    palette, DrawOp, FrameOutcome, FrameReport, FrameStatus, PaintScope, PainterOptions, TilePainter,
};
use tileview::types::{Bounds, Point, Rect, TileCoordinate};

fn painter(debug_overlay: bool, wait_for_tiles: bool) -> TilePainter {
    TilePainter::new(PainterOptions {
        debug_overlay,
        wait_for_tiles,
        ..PainterOptions::default()
    })
}

#[test]
fn test_full_view_paints_every_tile_once() {
    let config = text_config(1000.0, 1000.0);
    let tiles = grid_store(4, 4, 10);
    let ctx = context_at(&config, Point::ZERO);
    let mut canvas = canvas();

    let outcome = {
        let mut scope = PaintScope {
            canvas: &mut canvas,
            tiles: &tiles,
            config: &config,
            status: FrameStatus::default(),
        };
        painter(false, false).on_draw(&mut scope, &ctx, None)
    };

    // 800x600 from the origin touches columns 0..=3 and rows 0..=2.
    assert_eq!(
        outcome,
        FrameOutcome::Painted(FrameReport {
            painted: 12,
            placeholders: 0,
            skipped: 0
        })
    );
    let blits = canvas.blits();
    assert_eq!(blits.len(), 12);
    assert!(blits.contains(&(6, Rect::new(256.0, 256.0, 256.0, 256.0))));
}

#[test]
fn test_scrolled_view_offsets_destinations() {
    let config = text_config(2000.0, 2000.0);
    let tiles = grid_store(8, 8, 10);
    let ctx = context_at(&config, Point::new(100.0, 300.0));
    let mut canvas = canvas();
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus::default(),
    };
    painter(false, false).on_draw(&mut scope, &ctx, None);

    // Tile (256, 256) is image 10 in an 8-wide grid.
    assert!(canvas
        .blits()
        .contains(&(10, Rect::new(156.0, -44.0, 256.0, 256.0))));
}

#[test]
fn test_missing_tiles_are_skipped_or_placeholders() {
    let config = text_config(1000.0, 1000.0);
    let tiles = store_with(&[(0, 0, 10, 1), (256, 0, 10, 2)]);
    let ctx = context_at(&config, Point::ZERO);

    let mut plain = canvas();
    let outcome = {
        let mut scope = PaintScope {
            canvas: &mut plain,
            tiles: &tiles,
            config: &config,
            status: FrameStatus::default(),
        };
        painter(false, false).on_draw(&mut scope, &ctx, None)
    };
    assert_eq!(
        outcome,
        FrameOutcome::Painted(FrameReport {
            painted: 2,
            placeholders: 0,
            skipped: 10
        })
    );

    let mut debug = canvas();
    let outcome = {
        let mut scope = PaintScope {
            canvas: &mut debug,
            tiles: &tiles,
            config: &config,
            status: FrameStatus::default(),
        };
        painter(true, false).on_draw(&mut scope, &ctx, None)
    };
    assert_eq!(
        outcome,
        FrameOutcome::Painted(FrameReport {
            painted: 2,
            placeholders: 10,
            skipped: 0
        })
    );
    let checkerboard = debug.ops().iter().any(|op| {
        matches!(op, DrawOp::FillStyle { style } if style == palette::CHECKERBOARD_DARK)
    });
    assert!(checkerboard);
}

#[test]
fn test_wait_for_tiles_draws_nothing_until_complete() {
    let config = text_config(1000.0, 1000.0);
    let ctx = context_at(&config, Point::ZERO);
    let partial = store_with(&[(0, 0, 10, 1)]);
    let mut canvas = canvas();

    let outcome = {
        let mut scope = PaintScope {
            canvas: &mut canvas,
            tiles: &partial,
            config: &config,
            status: FrameStatus::default(),
        };
        painter(false, true).on_draw(&mut scope, &ctx, None)
    };
    assert_eq!(outcome, FrameOutcome::WaitingForTiles);
    assert!(canvas.ops().is_empty());

    let complete = grid_store(4, 3, 10);
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &complete,
        config: &config,
        status: FrameStatus::default(),
    };
    assert!(matches!(
        painter(false, true).on_draw(&mut scope, &ctx, None),
        FrameOutcome::Painted(FrameReport { painted: 12, .. })
    ));
}

#[test]
fn test_zoom_animation_suppresses_regular_draw() {
    let config = text_config(1000.0, 1000.0);
    let tiles = grid_store(4, 4, 10);
    let ctx = context_at(&config, Point::ZERO);
    let mut canvas = canvas();
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus {
            in_zoom_animation: true,
            zoom_changed: false,
        },
    };
    assert_eq!(
        painter(false, false).on_draw(&mut scope, &ctx, None),
        FrameOutcome::ZoomAnimation
    );

    let tile = tileview::types::Tile::ready(TileCoordinate::new(0, 0, 10, 0, 0), 1_u64);
    assert!(!painter(false, false).paint(&mut scope, &tile, &ctx, false));
    assert!(canvas.ops().is_empty());
}

#[test]
fn test_frozen_panes_composite_tile_crops() {
    let config = spreadsheet_config(5000.0, 5000.0, Point::new(100.0, 100.0));
    let tiles = store_with(&[(0, 0, 10, 1), (0, 1024, 10, 2)]);
    let ctx = context_at(&config, Point::new(0.0, 1000.0));
    let mut canvas = canvas();
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus::default(),
    };
    painter(false, false).on_draw(&mut scope, &ctx, None);

    assert_eq!(
        canvas.blits(),
        vec![
            // Frozen corner, then the frozen rows beside it.
            (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
            (1, Rect::new(100.0, 0.0, 156.0, 100.0)),
            // Frozen columns, then the scrolled main pane.
            (2, Rect::new(0.0, 100.0, 100.0, 180.0)),
            (2, Rect::new(100.0, 100.0, 156.0, 180.0)),
        ]
    );
}

#[test]
fn test_subset_limits_painted_tiles() {
    let config = text_config(1000.0, 1000.0);
    let tiles = grid_store(4, 4, 10);
    let ctx = context_at(&config, Point::ZERO);
    let subset = TilePainter::subset_bounds(&config, &[TileCoordinate::new(256, 256, 10, 0, 0)]).unwrap();
    assert_eq!(subset, Bounds::new(Point::new(256.0, 256.0), Point::new(512.0, 512.0)));

    let mut canvas = canvas();
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus::default(),
    };
    painter(false, false).on_draw(&mut scope, &ctx, Some(&subset));

    // Touching edges count as intersecting, so the 3x3 block around it paints.
    let images: Vec<u64> = canvas.blits().iter().map(|(image, _)| *image).collect();
    assert_eq!(images, vec![1, 2, 3, 5, 6, 7, 9, 10, 11]);
}

#[test]
fn test_file_based_tiles_stack_by_part() {
    let config = tileview::layout::ViewportConfig {
        file_based: Some(FileBasedLayout {
            part_width: 512.0,
            part_height: 700.0,
            gap: 20.0,
            parts: 3,
        }),
        ..text_config(512.0, 2160.0)
    };
    let mut tiles = tileview::render::MemoryTileStore::new(4);
    tiles.insert(tileview::types::Tile::ready(TileCoordinate::new(0, 0, 10, 1, 0), 42_u64));
    let ctx = context_at(&config, Point::new(0.0, 600.0));
    let mut canvas = canvas();
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus::default(),
    };
    painter(false, false).on_draw(&mut scope, &ctx, None);

    // Part 1 starts one 720px stride down.
    assert!(canvas
        .blits()
        .contains(&(42, Rect::new(0.0, 120.0, 256.0, 256.0))));
    // Labels run from the top visible page through the partly visible last one.
    let labels: Vec<&str> = canvas
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["1", "2", "3"]);
}
