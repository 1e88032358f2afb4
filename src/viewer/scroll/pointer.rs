//! Pointer interaction with the scroll bars: hover, drag and quick scroll.

use super::geometry::{along, ScrollGeometry};
use super::{Axis, BarState, QuickStep, ScrollEngine, ScrollScope};
use crate::types::Point;
use crate::viewer::container::{AnimationOptions, Cursor};
use crate::viewer::events::Propagation;

impl ScrollEngine {
    pub fn on_mouse_move(
        &mut self,
        scope: &mut ScrollScope<'_>,
        position: Point,
        drag_distance: Option<Point>,
    ) -> Propagation {
        self.clear_quick_scroll_timers();

        let dragging = scope.container.is_dragging_something();
        let axis = if self.vertical.clicked && dragging {
            Axis::Vertical
        } else if self.horizontal.clicked && dragging {
            Axis::Horizontal
        } else {
            self.update_hover(scope, position);
            return Propagation::Continue;
        };

        let previous = *self.previous_drag.get_or_insert(Point::ZERO);
        self.show_bar(scope, axis);
        let geometry = self.geometry(scope, axis);
        let distance = drag_distance.unwrap_or(previous);
        let diff = along(distance, axis) - along(previous, axis);

        self.axis_mut(axis).mode = BarState::Dragging;
        if self.is_pointer_synced(scope, axis, &geometry, position) {
            let delta = geometry.ratio * diff;
            match axis {
                Axis::Vertical => self.scroll_vertical_with_offset(scope, delta),
                Axis::Horizontal => self.scroll_horizontal_with_offset(scope, delta),
            };
        }

        if let Some(previous) = self.previous_drag.as_mut() {
            match axis {
                Axis::Vertical => previous.y = distance.y,
                Axis::Horizontal => previous.x = distance.x,
            }
        }
        Propagation::Stop
    }

    /// Pointer-down on the thumb starts a drag, on the railway a quick
    /// scroll toward the pointer.
    pub fn on_mouse_down(&mut self, scope: &mut ScrollScope<'_>, point: Point) -> Propagation {
        self.clear_quick_scroll_timers();
        self.on_mouse_move(scope, point, None);
        self.update_hover(scope, point);

        let mut propagation = Propagation::Continue;

        if self.offset.y >= 0.0 {
            let hit = self.in_vertical_zone(scope, point) && point.y > self.track(scope, Axis::Vertical).0;
            if hit {
                self.press_bar(scope, Axis::Vertical, point);
                propagation = Propagation::Stop;
            } else {
                self.vertical.clicked = false;
            }
        }

        if self.offset.x >= 0.0 {
            let hit = self.in_horizontal_zone(scope, point);
            if hit {
                self.press_bar(scope, Axis::Horizontal, point);
                propagation = Propagation::Stop;
            } else {
                self.horizontal.clicked = false;
            }
        }

        propagation
    }

    pub fn on_mouse_up(&mut self, scope: &mut ScrollScope<'_>, point: Point) -> Propagation {
        self.clear_quick_scroll_timers();

        let mut propagation = Propagation::Continue;
        if self.vertical.clicked {
            self.release_bar(Axis::Vertical);
            propagation = Propagation::Stop;
        } else if self.horizontal.clicked {
            self.release_bar(Axis::Horizontal);
            propagation = Propagation::Stop;
        } else if scope.container.is_dragging_something() && self.is_auto_scrolling() {
            self.stop_auto_scroll();
        }

        self.previous_drag = None;
        self.on_mouse_move(scope, point, None);
        propagation
    }

    pub fn on_mouse_leave(&mut self, scope: &mut ScrollScope<'_>) {
        self.hide_bar(scope, Axis::Vertical);
        self.hide_bar(scope, Axis::Horizontal);
    }

    /// A click anywhere stops a running wheel animation.
    pub fn on_click(&mut self, scope: &mut ScrollScope<'_>) {
        if scope.container.is_animating() && self.wheel.animating {
            self.halt_wheel_animation(scope.container);
        }
    }

    fn press_bar(&mut self, scope: &mut ScrollScope<'_>, axis: Axis, point: Point) {
        let geometry = self.geometry(scope, axis);
        let (start, end) = self.thumb_span(scope, axis, &geometry);
        let along_point = along(point, axis);
        let on_thumb = along_point >= start && along_point <= end;

        let state = self.axis_mut(axis);
        state.clicked = true;
        state.mode = if on_thumb {
            BarState::Dragging
        } else {
            BarState::QuickScrolling
        };
        if !on_thumb {
            self.quick_scroll(scope, axis, point, None);
        }
        let geometry = self.geometry(scope, axis);
        self.recapture_spacer = along_point - geometry.start;
        tracing::trace!(?axis, on_thumb, "scroll bar pressed");
    }

    fn release_bar(&mut self, axis: Axis) {
        let state = self.axis_mut(axis);
        state.clicked = false;
        state.mode = BarState::Idle;
        state.pointer_sync = true;
    }

    /// Move toward `point` on the railway.
    ///
    /// Step-by-step mode moves half a view and re-arms itself every step
    /// until the thumb reaches the pointer or the button is released.
    pub(super) fn quick_scroll(
        &mut self,
        scope: &mut ScrollScope<'_>,
        axis: Axis,
        point: Point,
        original_sign: Option<i8>,
    ) {
        if !scope.config.is_desktop() {
            return;
        }
        let geometry = self.geometry(scope, axis);
        let (start, end) = self.thumb_span(scope, axis, &geometry);
        let along_point = along(point, axis);

        let offset = if self.options.step_by_step_scrolling {
            let sign: i8 = if along_point - (start + geometry.scroll_size) > 0.0 {
                1
            } else if along_point - start < 0.0 {
                -1
            } else {
                0
            };
            let step_duration = self.options.step_duration;
            let state = self.axis_mut(axis);
            state.quick_timer.stop();
            if state.clicked {
                state.quick_step = Some(QuickStep {
                    point,
                    sign,
                    original_sign,
                });
                state.quick_timer.start_timeout(scope.now, step_duration);
            }
            geometry.step * f64::from(sign)
        } else {
            let mid = (start + end) * 0.5;
            ((along_point - mid) * geometry.ratio).round()
        };

        match axis {
            Axis::Vertical => self.scroll_vertical_with_offset(scope, offset),
            Axis::Horizontal => self.scroll_horizontal_with_offset(scope, offset),
        };
    }

    /// Thumb span along `axis` as drawn, with the RTL flip applied to the
    /// horizontal bar.
    pub(super) fn thumb_span(&self, scope: &ScrollScope<'_>, axis: Axis, geometry: &ScrollGeometry) -> (f64, f64) {
        let size = geometry.scroll_size - self.thickness;
        let start = match axis {
            Axis::Horizontal if scope.config.rtl => self.section_size.x - geometry.start - size,
            _ => geometry.start,
        };
        (start, start + size)
    }

    /// Once the pointer strays off the thumb during a drag, deltas are
    /// ignored until it comes back past the point where the thumb was
    /// grabbed.
    fn is_pointer_synced(
        &mut self,
        scope: &ScrollScope<'_>,
        axis: Axis,
        geometry: &ScrollGeometry,
        position: Point,
    ) -> bool {
        if !scope.config.is_desktop() {
            return true;
        }
        let was_synced = self.axis(axis).pointer_sync;
        let (start, end) = self.thumb_span(scope, axis, geometry);
        let pos = along(position, axis);

        let synced = if was_synced {
            let anchor = scope.container.document_anchor();
            let on_thumb = start < pos && end > pos;
            on_thumb || scope.container.section_includes_point(&anchor, position)
        } else {
            let spacer = self.recapture_spacer;
            let anchor_start = along(scope.container.document_anchor().top_left, axis);
            let band = self.options.recapture_band * scope.config.rounded_dpi_scale();
            if start < band + anchor_start {
                start + spacer < pos
            } else {
                start + spacer > pos
            }
        };

        if synced != was_synced {
            tracing::trace!(?axis, synced, "pointer sync with scroll bar changed");
        }
        self.axis_mut(axis).pointer_sync = synced;
        synced
    }

    fn in_vertical_zone(&self, scope: &ScrollScope<'_>, point: Point) -> bool {
        let usable = self.options.usable_thickness * scope.config.rounded_dpi_scale();
        if scope.config.rtl {
            point.x <= usable
        } else {
            point.x >= self.section_size.x - usable
        }
    }

    fn in_horizontal_zone(&self, scope: &ScrollScope<'_>, point: Point) -> bool {
        let usable = self.options.usable_thickness * scope.config.rounded_dpi_scale();
        if point.y < self.section_size.y - usable {
            return false;
        }
        let right_offset = self.right_offset(scope);
        let track_start = self.track(scope, Axis::Horizontal).0;
        let within = if scope.config.rtl {
            point.x >= right_offset
        } else {
            point.x <= self.section_size.x - right_offset
        };
        within && point.x >= track_start
    }

    /// Show or hide each bar depending on whether `point` is over it.
    fn update_hover(&mut self, scope: &mut ScrollScope<'_>, point: Point) {
        if self.offset.y >= 0.0 {
            let over = self.in_vertical_zone(scope, point) && point.y > self.track(scope, Axis::Vertical).0;
            if over {
                self.show_bar(scope, Axis::Vertical);
            } else {
                self.hide_bar(scope, Axis::Vertical);
            }
        }
        if self.offset.x >= 0.0 {
            if self.in_horizontal_zone(scope, point) {
                self.show_bar(scope, Axis::Horizontal);
            } else {
                self.hide_bar(scope, Axis::Horizontal);
            }
        }
    }

    fn show_bar(&mut self, scope: &mut ScrollScope<'_>, axis: Axis) {
        if scope.container.is_animating() && self.axis(axis).animating_bar {
            scope.container.stop_animating();
            self.on_animation_ended();
        }
        if self.axis(axis).hovered {
            return;
        }
        let hover_delay = self.options.hover_delay;
        let state = self.axis_mut(axis);
        state.draw_bar = true;
        state.hovered = true;
        state.thicken_timer.start_timeout(scope.now, hover_delay);
        scope.container.set_cursor(Cursor::Pointer);

        if !scope.container.is_dragging_something() && !scope.config.is_desktop() {
            scope.container.request_redraw();
        }
    }

    fn hide_bar(&mut self, scope: &mut ScrollScope<'_>, axis: Axis) {
        if !self.axis(axis).hovered {
            return;
        }
        let state = self.axis_mut(axis);
        state.hovered = false;
        state.thicken_timer.stop();
        scope.container.set_cursor(Cursor::Default);
        self.set_thickness(scope, self.options.bar_thickness);

        if !scope.config.is_desktop() {
            self.axis_mut(axis).draw_bar = false;
            self.fade_out_bar(scope, axis);
        }
    }

    /// Keep a hidden bar on screen for the idle period, then fade it.
    pub(super) fn fade_out_bar(&mut self, scope: &mut ScrollScope<'_>, axis: Axis) {
        if scope.container.is_animating() {
            scope.container.reset_animation();
            self.axis_mut(axis).animating_bar = true;
        } else {
            let options = AnimationOptions {
                duration: Some(self.options.idle_duration),
            };
            let started = scope.container.start_animating(options);
            self.axis_mut(axis).animating_bar = started;
        }
    }

    fn clear_quick_scroll_timers(&mut self) {
        self.vertical.clear_quick_scroll();
        self.horizontal.clear_quick_scroll();
    }
}
