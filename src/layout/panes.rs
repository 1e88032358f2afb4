//! Split-pane layout for frozen rows and columns.
//!
//! With a split at `(sx, sy)` and view bounds `[min, max]` the document is
//! shown in up to four panes (document core pixels):
//!
//! - top-left `[0, 0] - [sx, sy]`, frozen on both axes
//! - top-right `[min.x + sx, 0] - [max.x, sy]`, frozen rows
//! - bottom-left `[0, min.y + sy] - [sx, max.y]`, frozen columns
//! - main `[min + split, max]`, always present
//!
//! A pane only exists when its split axis is non-zero. Without any split the
//! main pane is the view itself.

use crate::types::{Bounds, Point};

/// Which axes a pane keeps fixed while the rest of the view scrolls or zooms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneFreeze {
    pub freeze_x: bool,
    pub freeze_y: bool,
}

/// Pane bounds for `view` split at `split`, main pane last.
pub fn pane_bounds_list(view: &Bounds, split: Point) -> Vec<Bounds> {
    let has_x = split.x > 0.0;
    let has_y = split.y > 0.0;
    let mut panes = Vec::with_capacity(4);

    if has_x && has_y {
        panes.push(Bounds::new(Point::ZERO, split));
    }
    if has_y {
        panes.push(Bounds::new(
            Point::new(view.min.x + split.x, 0.0),
            Point::new(view.max.x, split.y),
        ));
    }
    if has_x {
        panes.push(Bounds::new(
            Point::new(0.0, view.min.y + split.y),
            Point::new(split.x, view.max.y),
        ));
    }

    if panes.is_empty() {
        panes.push(*view);
    } else {
        panes.push(Bounds::new(view.min + split, view.max));
    }
    panes
}

/// Freeze flags for each pane in a zoom frame.
///
/// A pane at document origin on an axis where another pane sits further out
/// keeps its document extent on that axis.
pub fn pane_freeze(pane: &Bounds, max_min: Point) -> PaneFreeze {
    PaneFreeze {
        freeze_x: pane.min.x <= 0.0 && max_min.x > 0.0,
        freeze_y: pane.min.y <= 0.0 && max_min.y > 0.0,
    }
}

/// Largest pane minimum along each axis.
pub fn max_pane_min(panes: &[Bounds]) -> Point {
    panes
        .iter()
        .fold(Point::ZERO, |acc, pane| acc.max(pane.min))
}
