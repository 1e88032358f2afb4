//! Property-based invariant tests for scrolling and tile geometry.
//!
//! 1. Scroll-to always lands inside the scroll range.
//! 2. Relative scrolling from inside the range never leaves it.
//! 3. Tile ranges enumerate each index once and cover their bounds.
//! 4. Tile coverage fractions stay within [0, 1].
//! 5. An animated wheel notch always travels its full distance.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::collections::HashSet;

use common::text_config;
use proptest::prelude::*;
use tileview::layout::{DocType, ViewportConfig};
use tileview::replay::{Replay, ReplayContainer, Scenario, ScenarioStep};
use tileview::types::{tile_intersection_area_fraction, Bounds, Point, TileRange};
use tileview::viewer::{Axis, InputEvent, ScrollEngine, ScrollOptions, ScrollScope, WheelInput, FRAME_MS};

// ── Helpers ─────────────────────────────────────────────────────────────

fn bounds_strategy() -> impl Strategy<Value = Bounds> {
    (-2000.0f64..2000.0, -2000.0f64..2000.0, 0.0f64..3000.0, 0.0f64..3000.0)
        .prop_map(|(x, y, w, h)| Bounds::from_origin_size(Point::new(x, y), Point::new(w, h)))
}

fn doc_type_strategy() -> impl Strategy<Value = DocType> {
    prop_oneof![Just(DocType::Text), Just(DocType::Spreadsheet), Just(DocType::Presentation)]
}

fn in_range(engine: &mut ScrollEngine, config: &ViewportConfig, container: &mut ReplayContainer) -> bool {
    let mut scope = ScrollScope::new(config, container, 0.0);
    let offset = engine.offset();
    let v = engine.geometry(&mut scope, Axis::Vertical);
    let h = engine.geometry(&mut scope, Axis::Horizontal);
    offset.y >= v.min && offset.y <= v.max && offset.x >= h.min && offset.x <= h.max
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Scroll-to lands inside the range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_to_stays_in_range(
        doc_w in 1.0f64..10_000.0,
        doc_h in 1.0f64..10_000.0,
        view_w in 100.0f64..2000.0,
        view_h in 100.0f64..2000.0,
        doc_type in doc_type_strategy(),
        target_x in -20_000.0f64..20_000.0,
        target_y in -20_000.0f64..20_000.0,
    ) {
        let config = ViewportConfig { doc_type, ..text_config(doc_w, doc_h) };
        let view = Point::new(view_w, view_h);
        let mut container = ReplayContainer::with_size(view);
        let mut engine = ScrollEngine::new(ScrollOptions::default());
        engine.initialize(&config);
        engine.resize(view);

        engine.on_scroll_to(&mut ScrollScope::new(&config, &mut container, 0.0), Point::new(target_x, target_y));
        prop_assert!(
            in_range(&mut engine, &config, &mut container),
            "offset {:?} escaped the range for doc {}x{} in view {}x{}",
            engine.offset(), doc_w, doc_h, view_w, view_h
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Relative scrolling stays in range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_by_sequence_stays_in_range(
        doc_w in 2000.0f64..10_000.0,
        doc_h in 2000.0f64..10_000.0,
        doc_type in doc_type_strategy(),
        rtl in any::<bool>(),
        deltas in prop::collection::vec((-3000.0f64..3000.0, -3000.0f64..3000.0), 1..20),
    ) {
        let config = ViewportConfig { doc_type, rtl, ..text_config(doc_w, doc_h) };
        let view = Point::new(800.0, 600.0);
        let mut container = ReplayContainer::with_size(view);
        let mut engine = ScrollEngine::new(ScrollOptions::default());
        engine.initialize(&config);
        engine.resize(view);

        for (dx, dy) in deltas {
            engine.on_scroll_by(&mut ScrollScope::new(&config, &mut container, 0.0), Point::new(dx, dy));
            prop_assert!(
                in_range(&mut engine, &config, &mut container),
                "offset {:?} escaped the range after ({}, {})",
                engine.offset(), dx, dy
            );
        }
        // Every applied offset was reported to the container.
        let last = container.offset_updates.last().copied().unwrap_or(Point::ZERO);
        prop_assert_eq!(last, engine.offset());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Tile ranges enumerate each index once
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tile_range_enumerates_each_tile_once(bounds in bounds_strategy(), tile in 16.0f64..512.0) {
        let range = TileRange::from_bounds(&bounds, Point::new(tile, tile));
        let tiles: Vec<(i64, i64)> = range.iter().collect();
        let unique: HashSet<(i64, i64)> = tiles.iter().copied().collect();
        prop_assert_eq!(unique.len(), tiles.len());

        let expected = (range.max_x - range.min_x + 1) * (range.max_y - range.min_y + 1);
        prop_assert_eq!(i64::try_from(tiles.len()).unwrap(), expected);

        // The tiles together cover the bounds.
        let first = tiles.first().copied().unwrap();
        let last = tiles.last().copied().unwrap();
        prop_assert!(first.0 as f64 * tile <= bounds.min.x);
        prop_assert!(first.1 as f64 * tile <= bounds.min.y);
        prop_assert!((last.0 + 1) as f64 * tile > bounds.max.x);
        prop_assert!((last.1 + 1) as f64 * tile > bounds.max.y);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Coverage fractions stay within [0, 1]
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_fraction_is_a_fraction(tile in bounds_strategy(), view in bounds_strategy()) {
        let fraction = tile_intersection_area_fraction(&tile, &view);
        prop_assert!((0.0..=1.0).contains(&fraction), "fraction {} for {:?} in {:?}", fraction, tile, view);
        if view.contains(&tile) && tile.size().x > 0.0 && tile.size().y > 0.0 {
            prop_assert!((fraction - 1.0).abs() < 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Wheel notches land exactly
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn wheel_animation_travels_full_distance(lines in 1u8..=10, line_height in 8.0f64..40.0) {
        let mut replay = Replay::new(&Scenario {
            config: text_config(2000.0, 60_000.0),
            line_height,
            ..Scenario::default()
        })
        .unwrap();
        replay.step(&ScenarioStep::Input {
            event: InputEvent::Wheel {
                x: 400.0,
                y: 300.0,
                input: WheelInput::lines(f64::from(lines)),
                now: 0.0,
            },
        });
        for frame in 1..=200 {
            replay.frame(f64::from(frame) * FRAME_MS);
            replay.frames.clear();
        }

        let expected = f64::from(lines) * line_height;
        prop_assert!(
            (replay.session.offset().y - expected).abs() < 1e-6,
            "travelled {} instead of {}",
            replay.session.offset().y, expected
        );
        prop_assert!(!replay.container.clock.is_running());
    }
}
