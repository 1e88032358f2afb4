//! Zoom frame tests
//!
//! Source level selection and the rescaled blits of pinch and wheel zoom
//! frames.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{canvas, grid_store, store_with, text_config, VIEW};
use tileview::layout::{PaintContext, ViewportConfig, ZoomFrame};
use tileview::render::{FrameStatus, PaintScope, PainterOptions, TilePainter};
use tileview::types::{Bounds, Point, Rect};

fn frame(scale: f64, center: Point) -> ZoomFrame {
    ZoomFrame {
        scale,
        new_center: center,
        pinch_start_center: center,
    }
}

fn zoomed_context(config: &ViewportConfig, frame: Option<ZoomFrame>) -> PaintContext {
    PaintContext::new(config, Point::ZERO, VIEW, VIEW, frame)
}

fn zoom_5_config() -> ViewportConfig {
    ViewportConfig {
        zoom: 5,
        ..text_config(2000.0, 3000.0)
    }
}

#[test]
fn test_best_zoom_level_prefers_better_coverage() {
    let config = zoom_5_config();
    let ctx = zoomed_context(&config, None);
    let area = Bounds::new(Point::new(200.0, 106.0), Point::new(305.0, 306.0));

    // The coarser tile covers the whole area; the two finer ones only its
    // top half, which outweighs their resolution bonus.
    let partial = store_with(&[(0, 0, 5, 1), (256, 0, 5, 2), (0, 0, 4, 3)]);
    assert_eq!(
        TilePainter::best_zoom_level::<u64, _>(&config, &ctx, &partial, &area, 5, 0.95),
        4
    );

    // Complete coverage at the current level ties and wins as the nearer one.
    let complete = store_with(&[
        (0, 0, 5, 1),
        (256, 0, 5, 2),
        (0, 256, 5, 3),
        (256, 256, 5, 4),
        (0, 0, 4, 5),
    ]);
    assert_eq!(
        TilePainter::best_zoom_level::<u64, _>(&config, &ctx, &complete, &area, 5, 0.95),
        5
    );
}

#[test]
fn test_best_zoom_level_without_tiles_keeps_target() {
    let config = zoom_5_config();
    let ctx = zoomed_context(&config, None);
    let empty = store_with(&[]);
    let area = Bounds::new(Point::ZERO, Point::new(800.0, 600.0));
    assert_eq!(
        TilePainter::best_zoom_level::<u64, _>(&config, &ctx, &empty, &area, 5, 0.95),
        5
    );
}

#[test]
fn test_zoom_out_substitutes_coarser_tiles() {
    let config = zoom_5_config();
    let tiles = store_with(&[(0, 0, 4, 7)]);
    let ctx = zoomed_context(&config, Some(frame(0.95, Point::new(400.0, 300.0))));
    let mut canvas = canvas();
    let mut painter = TilePainter::new(PainterOptions::default());
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus {
            in_zoom_animation: true,
            zoom_changed: false,
        },
    };

    assert!(painter.draw_zoom_frame(&mut scope, &ctx));
    let blits = canvas.blits();
    assert_eq!(blits.len(), 1);
    assert_eq!(blits[0].0, 7);
}

#[test]
fn test_zoom_in_rescales_current_tiles() {
    let config = text_config(1000.0, 1000.0);
    let tiles = grid_store(4, 4, 10);
    let ctx = zoomed_context(&config, Some(frame(2.0, Point::new(400.0, 300.0))));
    let mut canvas = canvas();
    let mut painter = TilePainter::new(PainterOptions::default());
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus::default(),
    };
    assert!(painter.draw_zoom_frame(&mut scope, &ctx));

    // The frame shows document area (200, 150)..(600, 450) at twice the size.
    let blits = canvas.blits();
    assert_eq!(blits.len(), 6);
    assert!(blits.contains(&(6, Rect::new(112.5, 212.5, 513.5, 389.5))));
}

#[test]
fn test_zoom_frame_needs_a_usable_scale() {
    let config = text_config(1000.0, 1000.0);
    let tiles = grid_store(4, 4, 10);
    let mut canvas = canvas();
    let mut painter = TilePainter::new(PainterOptions::default());
    let mut scope = PaintScope {
        canvas: &mut canvas,
        tiles: &tiles,
        config: &config,
        status: FrameStatus::default(),
    };

    assert!(!painter.draw_zoom_frame(&mut scope, &zoomed_context(&config, None)));
    let broken = zoomed_context(&config, Some(frame(0.0, Point::ZERO)));
    assert!(!painter.draw_zoom_frame(&mut scope, &broken));
    assert!(canvas.ops().is_empty());
}

#[test]
fn test_zoom_map_center_scales_the_pinch_point() {
    let config = text_config(1000.0, 1000.0);
    let ctx = zoomed_context(&config, Some(frame(2.0, Point::new(400.0, 300.0))));
    assert_eq!(
        TilePainter::zoom_map_center(&config, &ctx),
        Some(Point::new(800.0, 600.0))
    );
    assert_eq!(TilePainter::zoom_map_center(&config, &zoomed_context(&config, None)), None);
}
