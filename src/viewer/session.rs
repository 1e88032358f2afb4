//! One viewport: configuration, scroll engine and tile painter.
//!
//! The session is where the fixed frame order lives: pending and kinetic
//! scroll first, then the paint context is taken from the new offset, then
//! tiles, then the scroll bars.

use super::container::{Container, FrameTiming};
use super::events::{InputEvent, Propagation};
use super::scroll::{Axis, ScrollEngine, ScrollGeometry, ScrollOptions, ScrollScope};
use crate::error::Result;
use crate::layout::zoom::zoom_scale;
use crate::layout::{PaintContext, ViewportConfig, ZoomFrame};
use crate::render::{Canvas, FrameOutcome, FrameStatus, PaintScope, PainterOptions, TilePainter, TileStore};
use crate::types::Point;

pub struct ViewportSession {
    config: ViewportConfig,
    painter: TilePainter,
    engine: ScrollEngine,
    canvas_size: Point,
    zoom_frame: Option<ZoomFrame>,
}

impl ViewportSession {
    pub fn new(config: ViewportConfig, painter: PainterOptions, scroll: ScrollOptions) -> Result<Self> {
        config.validate()?;
        let mut engine = ScrollEngine::new(scroll);
        engine.initialize(&config);
        Ok(Self {
            config,
            painter: TilePainter::new(painter),
            engine,
            canvas_size: Point::ZERO,
            zoom_frame: None,
        })
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Replace the configuration; the old one is kept if `config` is invalid.
    pub fn set_config(&mut self, config: ViewportConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn painter(&self) -> &TilePainter {
        &self.painter
    }

    pub fn painter_mut(&mut self) -> &mut TilePainter {
        &mut self.painter
    }

    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ScrollEngine {
        &mut self.engine
    }

    /// Document offset in canvas pixels.
    pub fn offset(&self) -> Point {
        self.engine.offset()
    }

    pub fn canvas_size(&self) -> Point {
        self.canvas_size
    }

    pub fn resize(&mut self, canvas_size: Point) {
        self.canvas_size = canvas_size;
        self.engine.resize(canvas_size);
    }

    /// Paint context for the current offset.
    pub fn paint_context(&self, container: &dyn Container) -> PaintContext {
        let anchor = container.document_anchor();
        PaintContext::new(
            &self.config,
            self.engine.offset(),
            anchor.size,
            self.canvas_size,
            self.zoom_frame,
        )
    }

    /// Run one display frame.
    ///
    /// `timing` is the animation clock's frame, `None` when nothing animates.
    pub fn on_frame<C, S>(
        &mut self,
        canvas: &mut C,
        tiles: &S,
        container: &mut dyn Container,
        now: f64,
        timing: Option<FrameTiming>,
    ) -> FrameOutcome
    where
        C: Canvas,
        S: TileStore<C::Image> + ?Sized,
    {
        {
            let mut scope = ScrollScope::new(&self.config, container, now);
            if scope.container.drawing_allowed() {
                self.engine.complete_pending_scroll(&mut scope);
            }
            if let Some(timing) = &timing {
                self.engine.on_animate(&mut scope, timing);
            }
        }

        let ctx = self.paint_context(container);
        let status = FrameStatus {
            in_zoom_animation: self.zoom_frame.is_some() || container.is_in_zoom_animation(),
            zoom_changed: container.is_zoom_changed(),
        };
        let anchor = container.document_anchor();

        canvas.save();
        canvas.translate(anchor.top_left.x, anchor.top_left.y);
        let outcome = {
            let mut paint = PaintScope {
                canvas: &mut *canvas,
                tiles,
                config: &self.config,
                status,
            };
            if ctx.zoom_frame.is_some() {
                if !self.painter.draw_zoom_frame(&mut paint, &ctx) {
                    tracing::warn!("zoom frame could not be drawn");
                }
                FrameOutcome::ZoomAnimation
            } else {
                self.painter.on_draw(&mut paint, &ctx, None)
            }
        };
        canvas.restore();

        let mut scope = ScrollScope::new(&self.config, container, now);
        self.engine.on_draw(canvas, &mut scope);

        if timing.is_some_and(|t| t.finished) {
            self.engine.on_animation_ended();
        }
        outcome
    }

    /// Route one non-frame input event to the scroll engine.
    pub fn handle_input(&mut self, container: &mut dyn Container, event: &InputEvent) -> Propagation {
        let mut scope = ScrollScope::new(&self.config, container, event.now());
        let engine = &mut self.engine;
        match *event {
            InputEvent::MouseDown { x, y, .. } => engine.on_mouse_down(&mut scope, Point::new(x, y)),
            InputEvent::MouseMove { x, y, drag, .. } => engine.on_mouse_move(&mut scope, Point::new(x, y), drag),
            InputEvent::MouseUp { x, y, .. } => engine.on_mouse_up(&mut scope, Point::new(x, y)),
            InputEvent::MouseLeave { .. } => {
                engine.on_mouse_leave(&mut scope);
                Propagation::Continue
            }
            InputEvent::Click { .. } => {
                engine.on_click(&mut scope);
                Propagation::Continue
            }
            InputEvent::Wheel { ref input, .. } => engine.on_mouse_wheel(&mut scope, input),
            InputEvent::ScrollTo { x, y, .. } => {
                engine.on_scroll_to(&mut scope, Point::new(x, y));
                Propagation::Stop
            }
            InputEvent::ScrollBy { x, y, .. } => {
                engine.on_scroll_by(&mut scope, Point::new(x, y));
                Propagation::Stop
            }
            InputEvent::ScrollVelocity { vx, vy, .. } => {
                engine.on_scroll_velocity(&mut scope, Point::new(vx, vy));
                Propagation::Stop
            }
            InputEvent::Timers { .. } | InputEvent::Frame { .. } => {
                engine.poll_timers(&mut scope);
                Propagation::Continue
            }
        }
    }

    pub fn poll_timers(&mut self, container: &mut dyn Container, now: f64) {
        let mut scope = ScrollScope::new(&self.config, container, now);
        self.engine.poll_timers(&mut scope);
    }

    pub fn next_timer_due(&self) -> Option<f64> {
        self.engine.next_timer_due()
    }

    pub fn scroll_geometry(&mut self, container: &mut dyn Container, axis: Axis) -> ScrollGeometry {
        let mut scope = ScrollScope::new(&self.config, container, 0.0);
        self.engine.geometry(&mut scope, axis)
    }

    /// Enter a zoom animation. Kinetic scrolling and quick scroll stop
    /// immediately.
    pub fn begin_zoom_animation(&mut self, container: &mut dyn Container, frame: ZoomFrame) {
        self.engine.halt_kinetics(container);
        self.zoom_frame = Some(frame);
        tracing::debug!(scale = frame.scale, "zoom animation started");
    }

    /// Next frame of the running zoom animation.
    pub fn update_zoom_frame(&mut self, frame: ZoomFrame) {
        if self.zoom_frame.is_some() {
            self.zoom_frame = Some(frame);
        }
    }

    /// Leave the zoom animation at `zoom` (clamped to the zoom limits).
    pub fn end_zoom_animation(&mut self, zoom: i32) {
        self.zoom_frame = None;
        self.config.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        tracing::debug!(zoom = self.config.zoom, "zoom animation ended");
    }

    pub fn is_in_zoom_animation(&self) -> bool {
        self.zoom_frame.is_some()
    }

    /// Frame scale for animating toward `zoom`, limited to the zoom range.
    pub fn zoom_frame_scale(&self, zoom: f64) -> f64 {
        let limited = zoom.clamp(f64::from(self.config.min_zoom), f64::from(self.config.max_zoom));
        zoom_scale(limited, f64::from(self.config.zoom))
    }

    /// Document centre of the free pane in the running zoom frame.
    pub fn zoom_map_center(&self, container: &dyn Container) -> Option<Point> {
        TilePainter::zoom_map_center(&self.config, &self.paint_context(container))
    }
}
