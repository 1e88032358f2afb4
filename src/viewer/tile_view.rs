//! Browser surface: the `#[wasm_bindgen]` viewer over a `<canvas>`.
//!
//! `TileView` owns the session, a tile store of decoded tile canvases and
//! the DOM plumbing: mouse and wheel listeners, the requestAnimationFrame
//! loop and a single timeout re-armed to the next due timer.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

use super::animation::AnimationClock;
use super::container::{AnchorSection, AnimationOptions, Container, Cursor};
use super::events::{DeltaMode, InputEvent, Propagation, WheelInput};
use super::scroll::ScrollOptions;
use super::session::ViewportSession;
use crate::layout::{ViewportConfig, ZoomFrame};
use crate::render::{FrameOutcome, MemoryTileStore, PainterOptions, WebCanvas};
use crate::types::{Point, Tile, TileCoordinate};

/// CSS pixels per wheel line.
const LINE_HEIGHT_CSS: f64 = 16.0;

/// Tiles kept in memory.
const TILE_CAPACITY: usize = 1024;

pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// [`Container`] backed by the canvas element and the frame clock.
struct WebContainer {
    element: HtmlCanvasElement,
    anchor: AnchorSection,
    clock: AnimationClock,
    redraw_requested: bool,
    zoom_changed: bool,
    pointer_down_at: Option<Point>,
    dragging: bool,
    cursor: Cursor,
}

impl WebContainer {
    fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl Container for WebContainer {
    fn document_anchor(&self) -> AnchorSection {
        self.anchor
    }

    fn is_dragging_something(&self) -> bool {
        self.dragging
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn stop_animating(&mut self) {
        self.clock.stop();
    }

    fn start_animating(&mut self, options: AnimationOptions) -> bool {
        self.redraw_requested = true;
        self.clock.start(options)
    }

    fn reset_animation(&mut self) {
        self.clock.reset();
    }

    fn is_animating(&self) -> bool {
        self.clock.is_running()
    }

    fn is_zoom_changed(&self) -> bool {
        self.zoom_changed
    }

    fn is_in_zoom_animation(&self) -> bool {
        false
    }

    fn drawing_allowed(&self) -> bool {
        self.anchor.size.x > 0.0 && self.anchor.size.y > 0.0
    }

    fn scroll_line_height(&self) -> f64 {
        LINE_HEIGHT_CSS
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if cursor != self.cursor {
            self.cursor = cursor;
            if let Err(e) = self.element.style().set_property("cursor", cursor.css()) {
                tracing::warn!(error = ?e, cursor = cursor.css(), "failed to set cursor");
            }
        }
    }

    fn on_scroll_offset_updated(&mut self, offset: Point) {
        tracing::trace!(x = offset.x, y = offset.y, "scroll offset updated");
    }
}

/// Shared state that can be accessed by event handlers.
struct SharedState {
    session: ViewportSession,
    container: WebContainer,
    canvas: WebCanvas,
    tiles: MemoryTileStore<HtmlCanvasElement>,
    dpr: f64,
}

impl SharedState {
    /// Returns whether another frame is needed.
    fn run_frame(&mut self, now: f64) -> bool {
        let timing = self.container.clock.tick(now);
        self.container.redraw_requested = false;
        let outcome = self
            .session
            .on_frame(&mut self.canvas, &self.tiles, &mut self.container, now, timing);
        if outcome == FrameOutcome::WaitingForTiles {
            tracing::trace!("frame skipped until tiles arrive");
        }
        self.container.zoom_changed = false;
        self.container.clock.is_running() || self.container.redraw_requested
    }

    /// Canvas pixel position of a mouse event.
    fn event_point(&self, event: &MouseEvent) -> Point {
        let rect = self.container.element.get_bounding_client_rect();
        Point::new(
            (f64::from(event.client_x()) - rect.left()) * self.dpr,
            (f64::from(event.client_y()) - rect.top()) * self.dpr,
        )
    }

    fn update_config(&mut self, edit: impl FnOnce(&mut ViewportConfig)) -> Result<(), JsValue> {
        let mut config = self.session.config().clone();
        edit(&mut config);
        self.session.set_config(config)?;
        self.container.request_redraw();
        Ok(())
    }
}

/// rAF and timeout callbacks, kept outside the shared state so a callback
/// can re-arm itself while the state is borrowed.
#[derive(Default)]
struct Scheduler {
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    frame_pending: Cell<bool>,
    timer: RefCell<Option<Closure<dyn FnMut()>>>,
    timer_handle: Cell<Option<i32>>,
}

impl Scheduler {
    fn request_frame(&self) {
        if self.frame_pending.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let frame = self.frame.borrow();
        if let Some(callback) = frame.as_ref() {
            if window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .is_ok()
            {
                self.frame_pending.set(true);
            }
        }
    }

    /// Replace the pending timeout with one firing at `due`.
    fn arm_timer(&self, due: Option<f64>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(handle) = self.timer_handle.take() {
            window.clear_timeout_with_handle(handle);
        }
        let Some(due) = due else {
            return;
        };
        let delay = (due - now_ms()).max(0.0).ceil().min(f64::from(i32::MAX));
        #[allow(clippy::cast_possible_truncation)] // clamped to the i32 range above
        let delay = delay as i32;
        let timer = self.timer.borrow();
        if let Some(callback) = timer.as_ref() {
            if let Ok(handle) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
                self.timer_handle.set(Some(handle));
            }
        }
    }
}

/// Run `f` on the state, then schedule whatever it asked for.
fn with_state<R>(
    state: &Rc<RefCell<SharedState>>,
    scheduler: &Scheduler,
    f: impl FnOnce(&mut SharedState) -> R,
) -> R {
    let (result, redraw, due) = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let result = f(s);
        let redraw = s.container.take_redraw() || s.container.clock.is_running();
        (result, redraw, s.session.next_timer_due())
    };
    if redraw {
        scheduler.request_frame();
    }
    scheduler.arm_timer(due);
    result
}

fn dispatch(state: &Rc<RefCell<SharedState>>, scheduler: &Scheduler, event: &InputEvent) -> Propagation {
    with_state(state, scheduler, |s| s.session.handle_input(&mut s.container, event))
}

/// Tile viewport over an HTML canvas.
#[wasm_bindgen]
pub struct TileView {
    state: Rc<RefCell<SharedState>>,
    scheduler: Rc<Scheduler>,
    #[allow(dead_code)]
    mouse_closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
    #[allow(dead_code)]
    wheel_closure: Closure<dyn FnMut(WheelEvent)>,
}

#[wasm_bindgen]
impl TileView {
    /// Create a viewer drawing into `canvas`; listeners are installed here.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<TileView, JsValue> {
        console_error_panic_hook::set_once();

        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let css_width = f64::from(canvas.client_width().max(1));
        let css_height = f64::from(canvas.client_height().max(1));

        let web_canvas = WebCanvas::new(canvas.clone())?;
        web_canvas.resize(css_width, css_height, dpr);
        let size = Point::new(css_width * dpr, css_height * dpr).round();

        let config = ViewportConfig {
            dpi_scale: dpr,
            ..ViewportConfig::default()
        };
        let mut session = ViewportSession::new(config, PainterOptions::default(), ScrollOptions::default())?;
        session.resize(size);

        let state = Rc::new(RefCell::new(SharedState {
            session,
            container: WebContainer {
                element: canvas.clone(),
                anchor: AnchorSection::new(Point::ZERO, size),
                clock: AnimationClock::new(),
                redraw_requested: true,
                zoom_changed: false,
                pointer_down_at: None,
                dragging: false,
                cursor: Cursor::Default,
            },
            canvas: web_canvas,
            tiles: MemoryTileStore::new(TILE_CAPACITY),
            dpr,
        }));
        let scheduler = Rc::new(Scheduler::default());
        Self::install_scheduler(&state, &scheduler);

        let mouse_closures = Self::install_mouse_listeners(&canvas, &state, &scheduler);
        let wheel_closure = Self::install_wheel_listener(&canvas, &state, &scheduler);

        scheduler.request_frame();
        Ok(TileView {
            state,
            scheduler,
            mouse_closures,
            wheel_closure,
        })
    }

    /// Replace the whole configuration (a serialized `ViewportConfig`).
    pub fn set_config(&self, config: JsValue) -> Result<(), JsValue> {
        let config: ViewportConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
        with_state(&self.state, &self.scheduler, |s| s.update_config(|c| *c = config))
    }

    pub fn set_document_size(&self, width: f64, height: f64) -> Result<(), JsValue> {
        with_state(&self.state, &self.scheduler, |s| {
            s.update_config(|c| c.document_size = Point::new(width, height))
        })
    }

    pub fn set_split_pos(&self, x: f64, y: f64) -> Result<(), JsValue> {
        with_state(&self.state, &self.scheduler, |s| {
            s.update_config(|c| c.split_pos = Point::new(x, y))
        })
    }

    pub fn set_zoom(&self, zoom: i32) -> Result<(), JsValue> {
        with_state(&self.state, &self.scheduler, |s| {
            s.container.zoom_changed = s.session.config().zoom != zoom;
            s.update_config(|c| c.zoom = zoom)
        })
    }

    /// Resize to `width` x `height` CSS pixels.
    pub fn resize(&self, width: f64, height: f64) {
        with_state(&self.state, &self.scheduler, |s| {
            s.canvas.resize(width, height, s.dpr);
            let size = Point::new(width * s.dpr, height * s.dpr).round();
            s.container.anchor = AnchorSection::new(Point::ZERO, size);
            s.session.resize(size);
            s.container.request_redraw();
        });
    }

    /// Store a decoded tile bitmap.
    pub fn add_tile(&self, x: i32, y: i32, zoom: i32, part: i32, mode: i32, bitmap: HtmlCanvasElement) {
        let coords = TileCoordinate::new(i64::from(x), i64::from(y), zoom, part, mode);
        with_state(&self.state, &self.scheduler, |s| {
            match s.tiles.get_mut(&coords) {
                Some(tile) => tile.load(bitmap),
                None => {
                    s.tiles.insert(Tile::ready(coords, bitmap));
                }
            }
            s.container.request_redraw();
        });
    }

    pub fn remove_tile(&self, x: i32, y: i32, zoom: i32, part: i32, mode: i32) {
        let coords = TileCoordinate::new(i64::from(x), i64::from(y), zoom, part, mode);
        with_state(&self.state, &self.scheduler, |s| {
            if s.tiles.remove(&coords).is_some() {
                s.container.request_redraw();
            }
        });
    }

    /// Mark every tile stale; they keep drawing until replaced.
    pub fn invalidate_tiles(&self) {
        with_state(&self.state, &self.scheduler, |s| s.tiles.invalidate_all());
    }

    pub fn scroll_to(&self, x: f64, y: f64) {
        let event = InputEvent::ScrollTo { x, y, now: now_ms() };
        dispatch(&self.state, &self.scheduler, &event);
    }

    pub fn scroll_by(&self, x: f64, y: f64) {
        let event = InputEvent::ScrollBy { x, y, now: now_ms() };
        dispatch(&self.state, &self.scheduler, &event);
    }

    /// Auto scroll by `(vx, vy)` per interval; `(0, 0)` stops.
    pub fn scroll_velocity(&self, vx: f64, vy: f64) {
        let event = InputEvent::ScrollVelocity { vx, vy, now: now_ms() };
        dispatch(&self.state, &self.scheduler, &event);
    }

    /// Current scroll state as a JS object.
    pub fn scroll_state(&self) -> Result<JsValue, JsValue> {
        let state = self.state.borrow().session.engine().state();
        serde_wasm_bindgen::to_value(&state)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    pub fn begin_zoom_animation(&self, scale: f64, center_x: f64, center_y: f64) {
        let frame = zoom_frame(scale, center_x, center_y);
        with_state(&self.state, &self.scheduler, |s| {
            s.session.begin_zoom_animation(&mut s.container, frame);
            s.container.request_redraw();
        });
    }

    pub fn update_zoom_animation(&self, scale: f64, center_x: f64, center_y: f64) {
        let frame = zoom_frame(scale, center_x, center_y);
        with_state(&self.state, &self.scheduler, |s| {
            s.session.update_zoom_frame(frame);
            s.container.request_redraw();
        });
    }

    pub fn end_zoom_animation(&self, zoom: i32) {
        with_state(&self.state, &self.scheduler, |s| {
            s.container.zoom_changed = s.session.config().zoom != zoom;
            s.session.end_zoom_animation(zoom);
            s.container.request_redraw();
        });
    }

    pub fn set_debug_overlay(&self, enabled: bool) {
        with_state(&self.state, &self.scheduler, |s| {
            s.session.painter_mut().options_mut().debug_overlay = enabled;
            s.container.request_redraw();
        });
    }

    pub fn set_wait_for_tiles(&self, enabled: bool) {
        with_state(&self.state, &self.scheduler, |s| {
            s.session.painter_mut().options_mut().wait_for_tiles = enabled;
            s.container.request_redraw();
        });
    }

    /// Draw a frame now instead of waiting for the next animation frame.
    pub fn render(&self) {
        let again = self.state.borrow_mut().run_frame(now_ms());
        if again {
            self.scheduler.request_frame();
        }
    }
}

impl TileView {
    fn install_scheduler(state: &Rc<RefCell<SharedState>>, scheduler: &Rc<Scheduler>) {
        let weak_state: Weak<RefCell<SharedState>> = Rc::downgrade(state);
        let weak_scheduler: Weak<Scheduler> = Rc::downgrade(scheduler);
        let frame = Closure::wrap(Box::new(move |now: f64| {
            let (Some(state), Some(scheduler)) = (weak_state.upgrade(), weak_scheduler.upgrade()) else {
                return;
            };
            scheduler.frame_pending.set(false);
            let (again, due) = {
                let mut s = state.borrow_mut();
                let again = s.run_frame(now);
                (again, s.session.next_timer_due())
            };
            if again {
                scheduler.request_frame();
            }
            scheduler.arm_timer(due);
        }) as Box<dyn FnMut(f64)>);
        *scheduler.frame.borrow_mut() = Some(frame);

        let weak_state = Rc::downgrade(state);
        let weak_scheduler = Rc::downgrade(scheduler);
        let timer = Closure::wrap(Box::new(move || {
            let (Some(state), Some(scheduler)) = (weak_state.upgrade(), weak_scheduler.upgrade()) else {
                return;
            };
            scheduler.timer_handle.set(None);
            with_state(&state, &scheduler, |s| s.session.poll_timers(&mut s.container, now_ms()));
        }) as Box<dyn FnMut()>);
        *scheduler.timer.borrow_mut() = Some(timer);
    }

    fn install_mouse_listeners(
        canvas: &HtmlCanvasElement,
        state: &Rc<RefCell<SharedState>>,
        scheduler: &Rc<Scheduler>,
    ) -> Vec<Closure<dyn FnMut(MouseEvent)>> {
        let mut closures: Vec<Closure<dyn FnMut(MouseEvent)>> = Vec::new();
        let listeners: [(&str, fn(&mut SharedState, &MouseEvent) -> InputEvent); 5] = [
            ("mousedown", |s, event| {
                let point = s.event_point(event);
                s.container.pointer_down_at = Some(point);
                InputEvent::MouseDown { x: point.x, y: point.y, now: now_ms() }
            }),
            ("mousemove", |s, event| {
                let point = s.event_point(event);
                let drag = s.container.pointer_down_at.map(|origin| point - origin);
                s.container.dragging = drag.is_some();
                InputEvent::MouseMove { x: point.x, y: point.y, drag, now: now_ms() }
            }),
            ("mouseup", |s, event| {
                let point = s.event_point(event);
                s.container.pointer_down_at = None;
                InputEvent::MouseUp { x: point.x, y: point.y, now: now_ms() }
            }),
            ("mouseleave", |_, _| InputEvent::MouseLeave { now: now_ms() }),
            ("click", |s, event| {
                let point = s.event_point(event);
                InputEvent::Click { x: point.x, y: point.y, now: now_ms() }
            }),
        ];

        for (name, to_input) in listeners {
            let state = Rc::clone(state);
            let scheduler = Rc::clone(scheduler);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let input = to_input(&mut state.borrow_mut(), &event);
                let propagation = dispatch(&state, &scheduler, &input);
                if name == "mouseup" {
                    state.borrow_mut().container.dragging = false;
                }
                if propagation.is_stopped() {
                    event.stop_propagation();
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .ok();
            closures.push(closure);
        }
        closures
    }

    fn install_wheel_listener(
        canvas: &HtmlCanvasElement,
        state: &Rc<RefCell<SharedState>>,
        scheduler: &Rc<Scheduler>,
    ) -> Closure<dyn FnMut(WheelEvent)> {
        let state = Rc::clone(state);
        let scheduler = Rc::clone(scheduler);
        let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
            let raw_delta = Reflect::get(event.as_ref(), &JsValue::from_str("wheelDeltaY"))
                .ok()
                .and_then(|value| value.as_f64());
            let input = WheelInput {
                delta_x: event.delta_x(),
                delta_y: event.delta_y(),
                delta_mode: DeltaMode::from_dom(event.delta_mode()),
                raw_delta,
                time_stamp: event.time_stamp(),
                shift: event.shift_key(),
                ctrl: event.ctrl_key(),
            };
            let point = state.borrow().event_point(&event);
            let wheel = InputEvent::Wheel {
                x: point.x,
                y: point.y,
                input,
                now: now_ms(),
            };
            if dispatch(&state, &scheduler, &wheel).is_stopped() {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(WheelEvent)>);
        canvas
            .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())
            .ok();
        closure
    }
}

fn zoom_frame(scale: f64, center_x: f64, center_y: f64) -> ZoomFrame {
    let center = Point::new(center_x, center_y);
    ZoomFrame {
        scale,
        new_center: center,
        pinch_start_center: center,
    }
}
