//! Viewport session tests
//!
//! Frame ordering, zoom animation hand-off and scenario replay through the
//! public session API.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::text_config;
use tileview::layout::{ViewportConfig, ZoomFrame};
use tileview::render::{palette, DrawOp, FrameOutcome};
use tileview::replay::{replay, Replay, Scenario, ScenarioStep};
use tileview::types::{Point, Rect};
use tileview::viewer::{InputEvent, ViewportSession};
use tileview::TileviewError;

fn filled(config: ViewportConfig) -> Replay {
    Replay::new(&Scenario {
        config,
        fill_document: true,
        ..Scenario::default()
    })
    .unwrap()
}

fn input(event: InputEvent) -> ScenarioStep {
    ScenarioStep::Input { event }
}

fn blits(ops: &[DrawOp]) -> Vec<(u64, Rect)> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::DrawImage { image, dst, .. } => Some((*image, *dst)),
            _ => None,
        })
        .collect()
}

fn pinch(scale: f64) -> ZoomFrame {
    let center = Point::new(400.0, 300.0);
    ZoomFrame {
        scale,
        new_center: center,
        pinch_start_center: center,
    }
}

#[test]
fn test_latched_scroll_applies_before_painting() {
    let mut replay = filled(text_config(2000.0, 3000.0));
    replay.run(&[
        ScenarioStep::SetDrawingAllowed { allowed: false },
        input(InputEvent::ScrollTo {
            x: 100.0,
            y: 300.0,
            now: 0.0,
        }),
        ScenarioStep::SetDrawingAllowed { allowed: true },
        input(InputEvent::Frame { now: 16.0 }),
    ]);

    assert_eq!(replay.session.offset(), Point::new(100.0, 300.0));
    // The frame already paints from the new offset: tile (256, 256) is
    // bitmap 10 in the 8-column document grid.
    let frame = &replay.frames[0];
    assert!(blits(&frame.ops).contains(&(10, Rect::new(156.0, -44.0, 256.0, 256.0))));
}

#[test]
fn test_scroll_bars_paint_over_tiles() {
    let mut replay = filled(text_config(2000.0, 3000.0));
    replay.frame(16.0);
    let ops = &replay.frames[0].ops;

    let last_tile = ops
        .iter()
        .rposition(|op| matches!(op, DrawOp::DrawImage { .. }))
        .unwrap();
    let thumb = ops
        .iter()
        .position(|op| matches!(op, DrawOp::FillStyle { style } if style == palette::SCROLLBAR_THUMB))
        .unwrap();
    assert!(thumb > last_tile);
}

#[test]
fn test_begin_zoom_halts_kinetics_and_draws_zoom_frames() {
    let mut replay = filled(text_config(2000.0, 3000.0));
    replay.run(&[
        input(InputEvent::ScrollVelocity {
            vx: 0.0,
            vy: 50.0,
            now: 0.0,
        }),
        ScenarioStep::BeginZoom { frame: pinch(1.2) },
    ]);
    assert!(!replay.session.engine().is_auto_scrolling());
    assert!(replay.session.is_in_zoom_animation());

    assert_eq!(replay.frame(200.0), FrameOutcome::ZoomAnimation);
    assert_eq!(replay.session.offset(), Point::ZERO);
    assert!(!blits(&replay.frames[0].ops).is_empty());
}

#[test]
fn test_update_zoom_frame_needs_running_animation() {
    let mut replay = filled(text_config(2000.0, 3000.0));
    replay.step(&ScenarioStep::UpdateZoom { frame: pinch(1.5) });
    assert!(!replay.session.is_in_zoom_animation());
    assert!(matches!(replay.frame(16.0), FrameOutcome::Painted(_)));
}

#[test]
fn test_end_zoom_clamps_to_zoom_limits() {
    let mut replay = filled(text_config(2000.0, 3000.0));
    replay.run(&[
        ScenarioStep::BeginZoom { frame: pinch(3.0) },
        ScenarioStep::EndZoom { zoom: 25 },
    ]);
    assert!(!replay.session.is_in_zoom_animation());
    assert_eq!(replay.session.config().zoom, 18);
}

#[test]
fn test_zoom_change_skips_page_backgrounds_for_one_frame() {
    let mut replay = filled(ViewportConfig {
        page_rects: vec![Rect::new(0.0, 0.0, 800.0, 1000.0)],
        ..text_config(2000.0, 3000.0)
    });
    let sets_font = |ops: &[DrawOp]| ops.iter().any(|op| matches!(op, DrawOp::Font { .. }));

    replay.frame(16.0);
    assert!(sets_font(&replay.frames[0].ops));

    replay.step(&ScenarioStep::EndZoom { zoom: 11 });
    replay.frame(32.0);
    assert!(!sets_font(&replay.frames[1].ops));

    replay.frame(48.0);
    assert!(sets_font(&replay.frames[2].ops));
}

#[test]
fn test_zoom_frame_scale_is_limited() {
    let session = ViewportSession::new(
        text_config(2000.0, 3000.0),
        Default::default(),
        Default::default(),
    )
    .unwrap();
    assert!((session.zoom_frame_scale(12.0) - 1.44).abs() < 1e-9);
    assert!((session.zoom_frame_scale(40.0) - 1.2_f64.powi(8)).abs() < 1e-9);
}

#[test]
fn test_invalid_config_is_rejected_and_old_one_kept() {
    let mut session = ViewportSession::new(
        text_config(2000.0, 3000.0),
        Default::default(),
        Default::default(),
    )
    .unwrap();
    let broken = ViewportConfig {
        tile_size: 0.0,
        ..text_config(10.0, 10.0)
    };
    assert!(matches!(session.set_config(broken), Err(TileviewError::Config(_))));
    assert_eq!(session.config().document_size, Point::new(2000.0, 3000.0));

    assert!(ViewportSession::new(
        ViewportConfig {
            zoom: 30,
            ..ViewportConfig::default()
        },
        Default::default(),
        Default::default(),
    )
    .is_err());
}

#[test]
fn test_replay_scenario_from_json() {
    let scenario = Scenario::from_json(
        r#"{
            "config": {"document_size": {"x": 2000, "y": 3000}},
            "fill_document": true,
            "steps": [
                {"step": "input", "event": {"type": "scroll_by", "x": 0, "y": 500, "now": 0}},
                {"step": "input", "event": {"type": "frame", "now": 16}},
                {"step": "input", "event": {"type": "mouse_move", "x": 790, "y": 50, "now": 20}},
                {"step": "input", "event": {"type": "frame", "now": 32}}
            ]
        }"#,
    )
    .unwrap();
    let report = replay(&scenario).unwrap();

    assert_eq!(report.offset, Point::new(0.0, 500.0));
    assert_eq!(report.frames.len(), 2);
    assert_eq!(report.offset_updates, vec![Point::new(0.0, 500.0)]);
    assert_eq!(report.vertical.start, 100.0);
    assert_eq!(report.cursor, tileview::viewer::Cursor::Pointer);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["frames"][0]["outcome"]["outcome"], "painted");
}

#[test]
fn test_scenario_rejects_bad_canvas() {
    let err = Scenario::from_json(r#"{"canvas_size": {"x": 0, "y": 600}}"#).unwrap_err();
    assert!(matches!(err, TileviewError::Scenario(_)));
}
