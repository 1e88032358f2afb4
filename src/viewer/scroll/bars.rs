//! Scroll bar drawing and fade-out.

use std::f64::consts::PI;

use super::geometry::ScrollGeometry;
use super::{Axis, ScrollEngine, ScrollScope};
use crate::layout::Platform;
use crate::render::{palette, Canvas};
use crate::types::Rect;

impl ScrollEngine {
    /// Draw the visible bars on top of the tiles.
    pub fn on_draw<C: Canvas>(&mut self, canvas: &mut C, scope: &mut ScrollScope<'_>) {
        if self.is_bar_visible(Axis::Vertical) {
            let geometry = self.geometry(scope, Axis::Vertical);
            if scope.config.platform == Platform::Mobile {
                self.draw_vertical_slider(canvas, scope, &geometry);
            } else {
                self.draw_vertical_bar(canvas, scope, &geometry);
            }
        }
        if self.is_bar_visible(Axis::Horizontal) {
            let geometry = self.geometry(scope, Axis::Horizontal);
            self.draw_horizontal_bar(canvas, scope, &geometry);
        }
    }

    /// Alpha of a fading bar `elapsed` ms into the idle period.
    pub(super) fn update_alpha(&mut self, elapsed: f64) {
        let visible = self.options.alpha_when_visible;
        let fade_start = self.options.fade_out_starting_time;
        let fade_duration = self.options.fade_out_duration();
        self.current_alpha = if elapsed >= fade_start && fade_duration > 0.0 {
            ((1.0 - (elapsed - fade_start) / fade_duration) * visible).max(0.1)
        } else {
            visible
        };
    }

    fn bar_alpha(&self, axis: Axis) -> f64 {
        let state = self.axis(axis);
        if state.animating_bar {
            self.current_alpha
        } else if state.clicked {
            self.options.alpha_when_being_used
        } else {
            self.options.alpha_when_visible
        }
    }

    fn railway_alpha(scope: &ScrollScope<'_>) -> f64 {
        if scope.config.is_spreadsheet() {
            1.0
        } else {
            0.5
        }
    }

    fn draw_vertical_bar<C: Canvas>(&self, canvas: &mut C, scope: &ScrollScope<'_>, geometry: &ScrollGeometry) {
        let edge = self.options.edge_offset;
        let start_x = if scope.config.rtl {
            edge
        } else {
            self.section_size.x - self.thickness - edge
        };

        if self.options.draw_railway {
            let (track_start, track_length) = self.track(scope, Axis::Vertical);
            canvas.set_global_alpha(Self::railway_alpha(scope));
            canvas.set_fill_style(palette::SCROLLBAR_RAILWAY);
            canvas.fill_rect(Rect::new(
                start_x,
                track_start,
                self.options.railway_thickness * scope.config.rounded_dpi_scale(),
                track_length,
            ));
        }

        canvas.set_global_alpha(self.bar_alpha(Axis::Vertical));
        canvas.set_fill_style(palette::SCROLLBAR_THUMB);
        canvas.fill_rect(Rect::new(
            start_x,
            geometry.start,
            self.thickness,
            geometry.scroll_size - self.thickness,
        ));
        canvas.set_global_alpha(1.0);
    }

    fn draw_horizontal_bar<C: Canvas>(&self, canvas: &mut C, scope: &ScrollScope<'_>, geometry: &ScrollGeometry) {
        let start_y = self.section_size.y - self.thickness - self.options.edge_offset;
        let (start_x, end_x) = self.thumb_span(scope, Axis::Horizontal, geometry);

        if self.options.draw_railway {
            let (track_start, track_length) = self.track(scope, Axis::Horizontal);
            canvas.set_global_alpha(Self::railway_alpha(scope));
            canvas.set_fill_style(palette::SCROLLBAR_RAILWAY);
            canvas.fill_rect(Rect::new(
                track_start,
                start_y,
                track_length,
                self.options.railway_thickness * scope.config.rounded_dpi_scale(),
            ));
        }

        canvas.set_global_alpha(self.bar_alpha(Axis::Horizontal));
        canvas.set_fill_style(palette::SCROLLBAR_THUMB);
        canvas.fill_rect(Rect::new(start_x, start_y, end_x - start_x, self.thickness));
        canvas.set_global_alpha(1.0);
    }

    /// Circular handle with up and down arrows used on phones.
    fn draw_vertical_slider<C: Canvas>(&self, canvas: &mut C, scope: &ScrollScope<'_>, geometry: &ScrollGeometry) {
        let dpi = scope.config.rounded_dpi_scale();
        let radius = self.options.circle_slider_radius * dpi;
        let corner = self.options.arrow_corner_length * dpi;
        let arrow_gap = 5.0 * dpi;
        let arrow_height = (PI / 3.0).sin() * corner;

        canvas.set_global_alpha(self.bar_alpha(Axis::Vertical));
        canvas.set_stroke_style(palette::SCROLLBAR_THUMB);
        canvas.set_fill_style(palette::WHITE);

        let center_y = geometry.start + radius;
        let center_x = if scope.config.rtl {
            radius * 0.5
        } else {
            self.section_size.x - radius * 0.5
        };

        canvas.begin_path();
        canvas.arc(center_x, center_y, radius, 0.0, PI * 2.0);
        canvas.fill();
        canvas.stroke();

        canvas.set_fill_style(palette::SCROLLBAR_THUMB);
        for direction in [-1.0, 1.0] {
            let base_y = center_y + direction * arrow_gap;
            let left = center_x - corner * 0.5;
            canvas.begin_path();
            canvas.move_to(left, base_y);
            canvas.line_to(left + corner, base_y);
            canvas.line_to(center_x, base_y + direction * arrow_height);
            canvas.close_path();
            canvas.fill();
        }

        canvas.set_global_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_fade_alpha_curve() {
        let mut engine = ScrollEngine::default();
        engine.update_alpha(1000.0);
        assert_eq!(engine.current_alpha(), 0.5);
        engine.update_alpha(1900.0);
        assert!((engine.current_alpha() - 0.25).abs() < 1e-9);
        engine.update_alpha(2000.0);
        assert_eq!(engine.current_alpha(), 0.1);
    }
}
