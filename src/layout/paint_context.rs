//! Per-frame paint snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{Bounds, Point};

use super::config::ViewportConfig;
use super::panes::pane_bounds_list;

/// State of an in-flight pinch or wheel zoom animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomFrame {
    /// Scale of this frame relative to the current zoom level.
    pub scale: f64,
    /// Current pinch centre in document core pixels.
    pub new_center: Point,
    /// Pinch centre when the gesture started.
    pub pinch_start_center: Point,
}

/// Everything one draw call needs, computed once and shared by every tile.
///
/// Built fresh each frame and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintContext {
    /// Document area visible in the canvas, rounded to whole pixels.
    pub view_bounds: Bounds,
    /// Pane bounds, main pane last; `[view_bounds]` without a split.
    pub pane_bounds_list: Vec<Bounds>,
    pub tile_size: Point,
    pub split_pos: Point,
    pub pane_bounds_active: bool,
    pub canvas_size: Point,
    pub zoom_frame: Option<ZoomFrame>,
}

impl PaintContext {
    /// Snapshot for a view whose top-left document pixel is `view_top_left`.
    pub fn new(
        config: &ViewportConfig,
        view_top_left: Point,
        view_size: Point,
        canvas_size: Point,
        zoom_frame: Option<ZoomFrame>,
    ) -> Self {
        let view_bounds = Bounds::from_origin_size(view_top_left, view_size).round();
        let pane_bounds_active = config.pane_bounds_active();
        let pane_bounds_list = if pane_bounds_active {
            pane_bounds_list(&view_bounds, config.split_pos)
                .iter()
                .map(Bounds::round)
                .collect()
        } else {
            vec![view_bounds]
        };

        Self {
            view_bounds,
            pane_bounds_list,
            tile_size: config.tile_size_point(),
            split_pos: config.split_pos,
            pane_bounds_active,
            canvas_size,
            zoom_frame,
        }
    }
}
