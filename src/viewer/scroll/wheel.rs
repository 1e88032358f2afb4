//! Wheel scrolling: animated for mouse wheels, direct for touchpads.

use super::{Axis, ScrollEngine, ScrollScope};
use crate::types::{is_zero, Point};
use crate::viewer::container::{AnimationOptions, Container, FrameTiming};
use crate::viewer::events::{Propagation, WheelInput, WheelKind};

impl ScrollEngine {
    /// Wheel over the viewport. Ctrl+wheel is left to the zoom handler.
    pub fn on_mouse_wheel(&mut self, scope: &mut ScrollScope<'_>, input: &WheelInput) -> Propagation {
        if input.ctrl {
            return Propagation::Continue;
        }

        let config = scope.config;
        let line_height = scope.container.scroll_line_height();
        let page = scope.container.document_anchor().size.y;
        let delta = input.pixel_delta(line_height, page, config.dpi_scale);

        let (mut hscroll, mut vscroll) = (0.0, 0.0);
        if delta.y.abs() > delta.x.abs() {
            if input.shift {
                hscroll = delta.y;
            } else {
                vscroll = delta.y;
            }
        } else {
            hscroll = delta.x;
        }

        let kind = input.classify();
        let should_animate = self.animate_wheel(scope)
            && !self.wheel.disable_timer.is_active()
            && kind == WheelKind::Mouse;
        tracing::trace!(?kind, should_animate, hscroll, vscroll, "wheel");

        if should_animate {
            self.animate_scroll(scope, Point::new(hscroll, vscroll));
        } else {
            if self.wheel.animating {
                self.halt_wheel_animation(scope.container);
            } else {
                scope.container.stop_animating();
            }
            self.wheel
                .disable_timer
                .start_timeout(scope.now, self.options.scroll_direct_timeout);
            if !is_zero(hscroll) {
                self.perform_scroll(scope, Axis::Horizontal, hscroll);
            }
            if !is_zero(vscroll) {
                self.perform_scroll(scope, Axis::Vertical, vscroll);
            }
        }
        Propagation::Stop
    }

    /// Advance the kinetic wheel animation and the bar fade by one frame.
    ///
    /// Runs before the tiles are painted so they see the new offset.
    pub fn on_animate(&mut self, scope: &mut ScrollScope<'_>, timing: &FrameTiming) {
        if scope.container.is_animating() && timing.frame_count >= 0 {
            self.update_alpha(timing.elapsed);
        }
        if !self.wheel.animating {
            return;
        }

        let line_height = self.wheel_line_height(scope);
        let accel = line_height * self.options.scroll_animation_acceleration * timing.frame_time_ratio;
        let max_velocity = line_height * self.options.scroll_animation_max_velocity;

        let mut deltas = [0.0; 2];
        for ((remaining, velocity), step) in self
            .wheel
            .delta
            .iter_mut()
            .zip(self.wheel.velocity.iter_mut())
            .zip(deltas.iter_mut())
        {
            *step = kinetic_step(remaining, velocity, accel, max_velocity);
        }

        let [dx, dy] = deltas;
        if !is_zero(dx) {
            self.scroll_horizontal_with_offset(scope, dx);
        }
        if !is_zero(dy) {
            self.scroll_vertical_with_offset(scope, dy);
        }

        if self.wheel.delta.iter().all(|d| is_zero(*d)) {
            tracing::debug!("wheel animation finished");
            self.halt_wheel_animation(scope.container);
        }
    }

    /// Stop the endless wheel animation and drop its remaining distance.
    pub(super) fn halt_wheel_animation(&mut self, container: &mut dyn Container) {
        container.stop_animating();
        self.on_animation_ended();
    }

    fn animate_wheel(&self, scope: &ScrollScope<'_>) -> bool {
        self.options
            .animate_wheel_scroll
            .unwrap_or_else(|| scope.config.is_desktop())
    }

    fn wheel_line_height(&self, scope: &ScrollScope<'_>) -> f64 {
        scope.container.scroll_line_height() * scope.config.dpi_scale
    }

    /// Queue `delta` for the kinetic animation, starting it if needed.
    fn animate_scroll(&mut self, scope: &mut ScrollScope<'_>, delta: Point) {
        let max_delta = self.options.scroll_animation_max_delta * self.wheel_line_height(scope);
        let incoming = [delta.x, delta.y];
        for ((remaining, velocity), add) in self
            .wheel
            .delta
            .iter_mut()
            .zip(self.wheel.velocity.iter_mut())
            .zip(incoming)
        {
            if (add > 0.0) != (*remaining > 0.0) {
                *velocity = 0.0;
                *remaining = 0.0;
            }
            *remaining += add;
            if remaining.abs() > max_delta {
                *remaining = if add > 0.0 { max_delta } else { -max_delta };
            }
        }

        if !self.wheel.animating {
            scope.container.reset_animation();
            scope.container.start_animating(AnimationOptions::default());
            self.wheel.animating = true;
            tracing::debug!("wheel animation started");
        }
    }

    /// Direct scroll; a hidden bar flashes up and fades.
    fn perform_scroll(&mut self, scope: &mut ScrollScope<'_>, axis: Axis, delta: f64) {
        match axis {
            Axis::Horizontal => self.scroll_horizontal_with_offset(scope, delta),
            Axis::Vertical => self.scroll_vertical_with_offset(scope, delta),
        };
        if !self.axis(axis).draw_bar {
            if scope.container.is_animating() {
                scope.container.reset_animation();
                self.axis_mut(axis).animating_bar = true;
            } else {
                self.fade_out_bar(scope, axis);
            }
        }
    }
}

/// One frame of the kinetic curve on a single axis.
///
/// Speeds up by `accel` until the remaining distance is within stopping
/// distance, then slows down by `accel` (never below `accel`, so the
/// animation always lands). Returns the signed distance to scroll.
fn kinetic_step(remaining: &mut f64, velocity: &mut f64, accel: f64, max_velocity: f64) -> f64 {
    if is_zero(*remaining) || accel <= 0.0 {
        *remaining = 0.0;
        *velocity = 0.0;
        return 0.0;
    }
    let sign = remaining.signum();
    let distance = remaining.abs();
    let speed = velocity.abs();

    let stopping_distance = speed * (speed + accel) / (2.0 * accel);
    let speed = if distance <= stopping_distance {
        (speed - accel).max(accel)
    } else {
        (speed + accel).min(max_velocity)
    };

    if speed >= distance {
        *remaining = 0.0;
        *velocity = 0.0;
        sign * distance
    } else {
        *remaining -= sign * speed;
        *velocity = sign * speed;
        sign * speed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_kinetic_step_accelerates_then_lands() {
        let (mut remaining, mut velocity) = (48.0, 0.0);
        let mut speeds = Vec::new();
        let mut travelled = 0.0;
        for _ in 0..100 {
            if is_zero(remaining) {
                break;
            }
            travelled += kinetic_step(&mut remaining, &mut velocity, 3.2, 40.0);
            speeds.push(velocity);
        }
        assert!((travelled - 48.0).abs() < 1e-9);
        assert_eq!(remaining, 0.0);
        assert_eq!(speeds.last().copied(), Some(0.0));
        assert!(speeds.get(1) > speeds.first());
    }

    #[test]
    fn test_kinetic_step_respects_max_velocity() {
        let (mut remaining, mut velocity) = (-10_000.0, 0.0);
        for _ in 0..50 {
            kinetic_step(&mut remaining, &mut velocity, 3.2, 40.0);
        }
        assert_eq!(velocity, -40.0);
    }
}
