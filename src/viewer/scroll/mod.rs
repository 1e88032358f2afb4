//! Scroll bars and scrolling for one viewport.
//!
//! `ScrollEngine` owns the document offset. It reacts to pointer, wheel and
//! programmatic requests, clamps every change to the scrollable range and
//! draws the bars on top of the tiles.
//!
//! - `geometry`: bar geometry and clamped offset updates
//! - `pointer`: hover, drag and quick scroll on the railway
//! - `wheel`: wheel classification and kinetic scrolling
//! - `bars`: drawing and fade-out

mod bars;
mod geometry;
mod pointer;
mod wheel;

use serde::{Deserialize, Serialize};

use super::container::Container;
use super::timer::{next_due, TimerTask};
use crate::layout::ViewportConfig;
use crate::types::{is_zero, Point};

pub use geometry::ScrollGeometry;

/// Tunables, in device-independent pixels and milliseconds unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollOptions {
    /// Band along the edge where the pointer reveals the bar.
    pub usable_thickness: f64,
    pub bar_thickness: f64,
    /// Thickness while hovered.
    pub hover_thickness: f64,
    pub railway_thickness: f64,
    pub draw_railway: bool,
    pub minimum_scroll_size: f64,
    pub edge_offset: f64,
    /// Radius of the mobile circular slider.
    pub circle_slider_radius: f64,
    pub arrow_corner_length: f64,
    pub alpha_when_visible: f64,
    pub alpha_when_being_used: f64,
    pub idle_duration: f64,
    /// Fade-out start, counted inside `idle_duration`.
    pub fade_out_starting_time: f64,
    pub hover_delay: f64,
    /// Quick-scroll page steps instead of jumping to the click.
    pub step_by_step_scrolling: bool,
    pub step_duration: f64,
    /// `None` animates the wheel on desktop only.
    pub animate_wheel_scroll: Option<bool>,
    /// Velocity step per frame, as a fraction of the line height.
    pub scroll_animation_acceleration: f64,
    /// Velocity cap, as a fraction of the line height.
    pub scroll_animation_max_velocity: f64,
    /// Pending animated distance cap, in line heights.
    pub scroll_animation_max_delta: f64,
    /// Direct wheel scrolling suppresses animation for this long.
    pub scroll_direct_timeout: f64,
    pub velocity_interval: f64,
    /// Distance from the bar's end where pointer recapture flips sides.
    pub recapture_band: f64,
    pub auto_scroll_margin: f64,
    pub auto_scroll_speed: f64,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            usable_thickness: 20.0,
            bar_thickness: 6.0,
            hover_thickness: 8.0,
            railway_thickness: 12.0,
            draw_railway: true,
            minimum_scroll_size: 80.0,
            edge_offset: 0.0,
            circle_slider_radius: 24.0,
            arrow_corner_length: 10.0,
            alpha_when_visible: 0.5,
            alpha_when_being_used: 0.8,
            idle_duration: 2000.0,
            fade_out_starting_time: 1800.0,
            hover_delay: 100.0,
            step_by_step_scrolling: false,
            step_duration: 50.0,
            animate_wheel_scroll: None,
            scroll_animation_acceleration: 0.2,
            scroll_animation_max_velocity: 2.5,
            scroll_animation_max_delta: 75.0,
            scroll_direct_timeout: 100.0,
            velocity_interval: 100.0,
            recapture_band: 30.0,
            auto_scroll_margin: 50.0,
            auto_scroll_speed: 50.0,
        }
    }
}

impl ScrollOptions {
    pub fn fade_out_duration(&self) -> f64 {
        self.idle_duration - self.fade_out_starting_time
    }
}

/// What the engine needs from the outside for one call.
pub struct ScrollScope<'a> {
    pub config: &'a ViewportConfig,
    pub container: &'a mut dyn Container,
    /// Event or frame time in ms.
    pub now: f64,
}

impl<'a> ScrollScope<'a> {
    pub fn new(config: &'a ViewportConfig, container: &'a mut dyn Container, now: f64) -> Self {
        Self {
            config,
            container,
            now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Interaction state of one scroll bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarState {
    #[default]
    Idle,
    HoverTrack,
    Dragging,
    QuickScrolling,
}

/// How wheel input is currently being applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelMode {
    #[default]
    Idle,
    WheelAnimating,
    WheelDirect,
}

/// Snapshot of the engine's public state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Kinetic wheel velocity in canvas pixels per frame.
    pub velocity: Point,
    pub animating: bool,
    pub dragging: bool,
    pub pointer_sync_with_bar: bool,
}

/// Re-armed quick-scroll step.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QuickStep {
    point: Point,
    sign: i8,
    original_sign: Option<i8>,
}

#[derive(Debug, Clone)]
struct AxisState {
    draw_bar: bool,
    clicked: bool,
    mode: BarState,
    hovered: bool,
    animating_bar: bool,
    pointer_sync: bool,
    min: f64,
    max: f64,
    quick_timer: TimerTask,
    quick_step: Option<QuickStep>,
    thicken_timer: TimerTask,
}

impl AxisState {
    fn new(name: &'static str, thicken: &'static str) -> Self {
        Self {
            draw_bar: true,
            clicked: false,
            mode: BarState::Idle,
            hovered: false,
            animating_bar: false,
            pointer_sync: true,
            min: 0.0,
            max: 0.0,
            quick_timer: TimerTask::new(name),
            quick_step: None,
            thicken_timer: TimerTask::new(thicken),
        }
    }

    fn state(&self) -> BarState {
        if self.clicked {
            self.mode
        } else if self.hovered {
            BarState::HoverTrack
        } else {
            BarState::Idle
        }
    }

    fn clear_quick_scroll(&mut self) {
        self.quick_timer.stop();
        self.quick_step = None;
    }
}

#[derive(Debug, Clone)]
struct WheelState {
    /// Remaining animated distance per axis `[x, y]`.
    delta: [f64; 2],
    velocity: [f64; 2],
    animating: bool,
    disable_timer: TimerTask,
}

impl Default for WheelState {
    fn default() -> Self {
        Self {
            delta: [0.0; 2],
            velocity: [0.0; 2],
            animating: false,
            disable_timer: TimerTask::new("wheel-direct"),
        }
    }
}

/// Scroll bar geometry, pointer interaction and kinetic scrolling.
#[derive(Debug, Clone)]
pub struct ScrollEngine {
    options: ScrollOptions,
    /// Document top-left in canvas pixels.
    offset: Point,
    /// Size of the whole canvas the bars are drawn on.
    section_size: Point,
    thickness: f64,
    current_alpha: f64,
    vertical: AxisState,
    horizontal: AxisState,
    previous_drag: Option<Point>,
    recapture_spacer: f64,
    wheel: WheelState,
    velocity: Point,
    velocity_timer: TimerTask,
    pending_scroll: Option<Point>,
    initialized: bool,
}

impl Default for ScrollEngine {
    fn default() -> Self {
        Self::new(ScrollOptions::default())
    }
}

impl ScrollEngine {
    pub fn new(options: ScrollOptions) -> Self {
        Self {
            thickness: options.bar_thickness,
            current_alpha: 1.0,
            options,
            offset: Point::ZERO,
            section_size: Point::ZERO,
            vertical: AxisState::new("quick-scroll-vertical", "thicken-vertical"),
            horizontal: AxisState::new("quick-scroll-horizontal", "thicken-horizontal"),
            previous_drag: None,
            recapture_spacer: 0.0,
            wheel: WheelState::default(),
            velocity: Point::ZERO,
            velocity_timer: TimerTask::new("scroll-velocity"),
            pending_scroll: None,
            initialized: false,
        }
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    /// Adopt platform defaults from `config`. Called once before the first
    /// event; later calls are no-ops.
    pub fn initialize(&mut self, config: &ViewportConfig) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        let desktop = config.is_desktop();
        self.vertical.draw_bar = desktop;
        self.horizontal.draw_bar = desktop;
        self.thickness = self.options.bar_thickness * config.rounded_dpi_scale();
    }

    /// Document top-left in canvas pixels.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Place the document without clamping or notification, e.g. when the
    /// host restores a saved position.
    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    pub fn section_size(&self) -> Point {
        self.section_size
    }

    /// The bars cover the whole canvas.
    pub fn resize(&mut self, size: Point) {
        self.section_size = size;
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            offset_x: self.offset.x,
            offset_y: self.offset.y,
            velocity: Point::new(self.wheel.velocity[0], self.wheel.velocity[1]),
            animating: self.wheel.animating,
            dragging: self.vertical.state() == BarState::Dragging
                || self.horizontal.state() == BarState::Dragging,
            pointer_sync_with_bar: self.vertical.pointer_sync && self.horizontal.pointer_sync,
        }
    }

    pub fn bar_state(&self, axis: Axis) -> BarState {
        self.axis(axis).state()
    }

    pub fn wheel_mode(&self) -> WheelMode {
        if self.wheel.animating {
            WheelMode::WheelAnimating
        } else if self.wheel.disable_timer.is_active() {
            WheelMode::WheelDirect
        } else {
            WheelMode::Idle
        }
    }

    /// Whether the bar on `axis` is drawn this frame.
    pub fn is_bar_visible(&self, axis: Axis) -> bool {
        let state = self.axis(axis);
        state.draw_bar || state.animating_bar
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.velocity_timer.is_active()
    }

    pub fn pending_scroll(&self) -> Option<Point> {
        self.pending_scroll
    }

    /// Current bar thickness in canvas pixels.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn current_alpha(&self) -> f64 {
        self.current_alpha
    }

    /// Absolute scroll to `point` (document canvas pixels).
    ///
    /// While the container cannot draw, only the latest request is kept and
    /// replayed by [`ScrollEngine::complete_pending_scroll`].
    pub fn on_scroll_to(&mut self, scope: &mut ScrollScope<'_>, point: Point) {
        if !scope.container.drawing_allowed() {
            if self.pending_scroll.replace(point).is_some() {
                tracing::debug!(x = point.x, y = point.y, "replacing pending scroll");
            } else {
                tracing::debug!(x = point.x, y = point.y, "latching scroll until drawing is allowed");
            }
            return;
        }
        self.scroll_to(scope, point);
    }

    /// Replay the latched scroll-to request, if any.
    pub fn complete_pending_scroll(&mut self, scope: &mut ScrollScope<'_>) {
        if let Some(point) = self.pending_scroll.take() {
            tracing::debug!(x = point.x, y = point.y, "replaying pending scroll");
            self.scroll_to(scope, point);
        }
    }

    fn scroll_to(&mut self, scope: &mut ScrollScope<'_>, point: Point) {
        let (min_y, max_y) = self.update_min_max(scope, Axis::Vertical);
        let (min_x, max_x) = self.update_min_max(scope, Axis::Horizontal);
        // max/min rather than clamp: NaN bounds must not panic.
        let target = Point::new(point.x.max(min_x).min(max_x), point.y.max(min_y).min(max_y));
        if target != self.offset {
            self.apply_offset(scope, target);
        }
    }

    /// Relative scroll by `delta` canvas pixels.
    ///
    /// Spreadsheets never scroll above or left of the origin.
    pub fn on_scroll_by(&mut self, scope: &mut ScrollScope<'_>, delta: Point) {
        let mut delta = delta;
        if scope.config.is_spreadsheet() {
            if (delta.y < 0.0 && is_zero(self.offset.y)) || (delta.x < 0.0 && is_zero(self.offset.x)) {
                return;
            }
            if self.offset.y + delta.y < 0.0 {
                delta.y = -self.offset.y;
            }
            if self.offset.x + delta.x < 0.0 {
                delta.x = -self.offset.x;
            }
        }
        self.scroll_vertical_with_offset(scope, delta.y);
        self.scroll_horizontal_with_offset(scope, delta.x);
    }

    /// Keep scrolling by `velocity` per interval until `{0, 0}` arrives.
    pub fn on_scroll_velocity(&mut self, scope: &mut ScrollScope<'_>, velocity: Point) {
        if velocity.is_zero() {
            self.stop_auto_scroll();
            return;
        }
        self.velocity = velocity;
        self.velocity_timer.start_interval(scope.now, self.options.velocity_interval);
        tracing::debug!(vx = velocity.x, vy = velocity.y, "auto scroll started");
    }

    /// Cancel auto scroll. Safe to call when none is running.
    pub fn stop_auto_scroll(&mut self) {
        self.velocity = Point::ZERO;
        if self.velocity_timer.stop() {
            tracing::debug!("auto scroll stopped");
        }
    }

    /// Auto scroll while a selection is dragged near the viewport edge.
    ///
    /// `pos` and `view_size` are in CSS pixels relative to the view;
    /// `view_top_left` is the view's document position.
    pub fn on_handle_auto_scroll(
        &mut self,
        scope: &mut ScrollScope<'_>,
        pos: Point,
        view_size: Point,
        view_top_left: Point,
    ) {
        let margin = self.options.auto_scroll_margin;
        let speed = self.options.auto_scroll_speed;
        let mut velocity = Point::ZERO;

        if pos.y > view_size.y - margin {
            velocity.y = speed;
        } else if pos.y < margin && view_top_left.y > margin {
            velocity.y = -speed;
        }

        let rtl = scope.config.rtl;
        let pointer_x = if rtl { view_size.x - pos.x } else { pos.x };
        let view_left = if rtl { view_size.x - view_top_left.x } else { view_top_left.x };
        if pointer_x > view_size.x - margin {
            velocity.x = speed;
        } else if pointer_x < margin && view_left > margin {
            velocity.x = -speed;
        }

        self.on_scroll_velocity(scope, velocity);
    }

    /// Fire every timer due at `scope.now`.
    pub fn poll_timers(&mut self, scope: &mut ScrollScope<'_>) {
        let now = scope.now;

        if self.velocity_timer.poll(now) {
            let velocity = self.velocity;
            self.on_scroll_by(scope, velocity);
        }

        if self.wheel.disable_timer.poll(now) {
            tracing::trace!("wheel animation re-enabled");
        }

        for axis in [Axis::Vertical, Axis::Horizontal] {
            if self.axis_mut(axis).thicken_timer.poll(now) && self.axis(axis).hovered {
                self.set_thickness(scope, self.options.hover_thickness);
            }
            if self.axis_mut(axis).quick_timer.poll(now) {
                if let Some(step) = self.axis_mut(axis).quick_step.take() {
                    let keep_going = step.original_sign.is_none_or(|o| o == 0 || o == step.sign);
                    if keep_going {
                        self.quick_scroll(scope, axis, step.point, Some(step.sign));
                    }
                }
            }
        }
    }

    /// Earliest timer deadline, for the host to schedule a wake-up.
    pub fn next_timer_due(&self) -> Option<f64> {
        next_due([
            &self.velocity_timer,
            &self.wheel.disable_timer,
            &self.vertical.quick_timer,
            &self.horizontal.quick_timer,
            &self.vertical.thicken_timer,
            &self.horizontal.thicken_timer,
        ])
    }

    /// Stop every kinetic and quick-scroll timer.
    pub fn halt_kinetics(&mut self, container: &mut dyn Container) {
        self.stop_auto_scroll();
        self.vertical.clear_quick_scroll();
        self.horizontal.clear_quick_scroll();
        if self.wheel.animating {
            self.halt_wheel_animation(container);
        }
    }

    /// The container's animation finished or was stopped.
    pub fn on_animation_ended(&mut self) {
        self.vertical.animating_bar = false;
        self.horizontal.animating_bar = false;
        self.wheel.animating = false;
        self.wheel.delta = [0.0; 2];
        self.wheel.velocity = [0.0; 2];
    }

    fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    fn set_thickness(&mut self, scope: &mut ScrollScope<'_>, thickness: f64) {
        self.thickness = thickness * scope.config.rounded_dpi_scale();
        scope.container.request_redraw();
    }

    /// Commit a new offset and tell the container.
    fn apply_offset(&mut self, scope: &mut ScrollScope<'_>, offset: Point) {
        self.offset = offset;
        scope.container.on_scroll_offset_updated(offset);
        scope.container.request_redraw();
    }
}
