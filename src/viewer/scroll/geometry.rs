//! Scroll bar geometry and clamped offset updates.

use serde::{Deserialize, Serialize};

use super::{Axis, ScrollEngine, ScrollScope};
use crate::types::Point;

/// Geometry of one scroll bar, recomputed on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollGeometry {
    /// Track length the thumb moves along.
    pub scroll_length: f64,
    /// Thumb length.
    pub scroll_size: f64,
    /// Document pixels per track pixel.
    pub ratio: f64,
    /// Thumb position along the track, in canvas pixels.
    pub start: f64,
    /// Quick-scroll page step.
    pub step: f64,
    pub min: f64,
    pub max: f64,
    /// Canvas position where the track begins.
    pub offset: f64,
}

impl ScrollGeometry {
    /// End of the thumb as drawn (the thickness is taken off its length).
    pub fn thumb_end(&self, thickness: f64) -> f64 {
        self.start + self.scroll_size - thickness
    }
}

impl ScrollEngine {
    pub fn vertical_geometry(&mut self, scope: &mut ScrollScope<'_>) -> ScrollGeometry {
        self.geometry(scope, Axis::Vertical)
    }

    pub fn horizontal_geometry(&mut self, scope: &mut ScrollScope<'_>) -> ScrollGeometry {
        self.geometry(scope, Axis::Horizontal)
    }

    /// Geometry of the bar on `axis`; also refreshes the scroll range.
    pub fn geometry(&mut self, scope: &mut ScrollScope<'_>, axis: Axis) -> ScrollGeometry {
        let (min, max) = self.update_min_max(scope, axis);
        let (track_offset, mut scroll_length) = self.track(scope, axis);
        let doc_size = along(scope.config.document_size, axis);

        let mut scroll_size = if doc_size > 0.0 {
            (scroll_length * scroll_length / doc_size).round()
        } else {
            scroll_length
        };
        let minimum = self.options.minimum_scroll_size * scope.config.rounded_dpi_scale();
        if scroll_size < minimum {
            scroll_length -= minimum - scroll_size;
            scroll_size = minimum;
        }

        let ratio = if scroll_length > 0.0 {
            doc_size / scroll_length
        } else {
            0.0
        };
        let start = if ratio > 0.0 {
            (along(self.offset, axis) / ratio + track_offset).round()
        } else {
            track_offset
        };

        ScrollGeometry {
            scroll_length,
            scroll_size,
            ratio,
            start,
            step: along(self.section_size, axis) / 2.0,
            min,
            max,
            offset: track_offset,
        }
    }

    /// Track start and length before the minimum thumb size is applied.
    ///
    /// Spreadsheet tracks start below/right of the frozen panes. The
    /// horizontal track leaves room for the vertical bar at its end.
    pub(super) fn track(&self, scope: &ScrollScope<'_>, axis: Axis) -> (f64, f64) {
        let anchor = scope.container.document_anchor();
        let mut offset = along(anchor.top_left, axis);
        let mut length = along(anchor.size, axis);
        if axis == Axis::Horizontal {
            length -= self.right_offset(scope);
        }
        if scope.config.is_spreadsheet() {
            let split = along(scope.config.split_pos, axis).round();
            offset += split;
            length -= split;
        }
        (offset, length)
    }

    /// Gap kept at the end of the horizontal track.
    pub(super) fn right_offset(&self, scope: &ScrollScope<'_>) -> f64 {
        self.options.usable_thickness * scope.config.rounded_dpi_scale() * 2.0
    }

    /// Recompute the scroll range on `axis` and return `(min, max)`.
    ///
    /// A document smaller than the view is centred; its bar is hidden
    /// unless this is a desktop spreadsheet.
    pub(super) fn update_min_max(&mut self, scope: &mut ScrollScope<'_>, axis: Axis) -> (f64, f64) {
        let config = scope.config;
        let doc_size = along(config.document_size, axis);
        let anchor_size = along(scope.container.document_anchor().size, axis);
        let diff = (doc_size - anchor_size).round();
        let desktop = config.is_desktop();
        let spreadsheet = config.is_spreadsheet();

        let state = self.axis_mut(axis);
        if diff >= 0.0 {
            state.min = 0.0;
            state.max = diff;
            if desktop {
                state.draw_bar = true;
            }
        } else {
            let centred = ((doc_size - anchor_size) * 0.5).round();
            state.min = centred;
            state.max = centred;
            if doc_size > 0.0 && (!spreadsheet || !desktop) {
                state.draw_bar = false;
            }
        }
        (state.min, state.max)
    }

    /// Scroll down (positive) or up by `offset`, clamped to the range.
    ///
    /// Returns false when the offset is already at the bound.
    pub fn scroll_vertical_with_offset(&mut self, scope: &mut ScrollScope<'_>, offset: f64) -> bool {
        let (min, max) = self.update_min_max(scope, Axis::Vertical);
        let Some(target) = clamped_target(self.offset.y, offset, min, max) else {
            return false;
        };
        self.apply_offset(scope, Point::new(self.offset.x, target));
        true
    }

    /// Scroll right (positive) or left by `offset`, clamped to the range.
    ///
    /// Right-to-left documents scroll the other way.
    pub fn scroll_horizontal_with_offset(&mut self, scope: &mut ScrollScope<'_>, offset: f64) -> bool {
        let (min, max) = self.update_min_max(scope, Axis::Horizontal);
        let offset = if scope.config.rtl { -offset } else { offset };
        let Some(target) = clamped_target(self.offset.x, offset, min, max) else {
            return false;
        };
        self.apply_offset(scope, Point::new(target, self.offset.y));
        true
    }
}

/// New position after moving `current` by `delta` within `[min, max]`, or
/// `None` when that would not move it in the direction of `delta`.
fn clamped_target(current: f64, delta: f64, min: f64, max: f64) -> Option<f64> {
    if delta > 0.0 {
        let step = if current + delta > max { max - current } else { delta };
        (step > 0.0).then_some(current + step)
    } else {
        let step = if current + delta < min { min - current } else { delta };
        (step < 0.0).then_some(current + step)
    }
}

pub(super) fn along(point: Point, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => point.x,
        Axis::Vertical => point.y,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_clamped_target_limits_to_bounds() {
        assert_eq!(clamped_target(2300.0, 500.0, 0.0, 2400.0), Some(2400.0));
        assert_eq!(clamped_target(2400.0, 10.0, 0.0, 2400.0), None);
        assert_eq!(clamped_target(100.0, -500.0, 0.0, 2400.0), Some(0.0));
        assert_eq!(clamped_target(0.0, -1.0, 0.0, 2400.0), None);
        assert_eq!(clamped_target(10.0, 0.0, 0.0, 2400.0), None);
    }
}
