//! Pointer and wheel input, independent of the DOM.
//!
//! The browser surface converts DOM events into these values; the CLI reads
//! them from a scenario file.

use serde::{Deserialize, Serialize};

use crate::types::{is_zero, Point};

/// Raw wheel deltas above this are a notched mouse wheel.
pub const COARSE_RAW_DELTA: f64 = 32.0;

/// Mouse wheels report raw deltas in multiples of this.
pub const RAW_DELTA_NOTCH: f64 = 60.0;

/// Whether an event should keep bubbling to the sections below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    Continue,
    Stop,
}

impl Propagation {
    pub fn is_stopped(self) -> bool {
        self == Self::Stop
    }
}

/// Unit of a wheel event's deltas (`WheelEvent.deltaMode`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

/// Guess at the device behind a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelKind {
    /// Notched wheel; scrolled with an animation.
    Mouse,
    /// Precise, high-frequency deltas; applied directly.
    Touchpad,
}

/// One wheel event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
    /// Legacy `wheelDeltaY`/`wheelDelta` value where the platform reports one.
    pub raw_delta: Option<f64>,
    /// Event timestamp in ms.
    pub time_stamp: f64,
    pub shift: bool,
    pub ctrl: bool,
}

impl WheelInput {
    /// Line-mode vertical wheel notch.
    pub fn lines(delta_y: f64) -> Self {
        Self {
            delta_y,
            delta_mode: DeltaMode::Line,
            ..Self::default()
        }
    }

    /// Pixel-mode event as a touchpad produces it.
    pub fn pixels(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            ..Self::default()
        }
    }

    /// Best-effort mouse wheel versus touchpad classification.
    ///
    /// A mouse wheel needs a single active axis and either line units or a
    /// coarse raw delta. Pixel deltas additionally need a raw delta on the
    /// wheel's notch grid; on platforms with a fractional event clock the
    /// touchpad also reports fractional deltas, so those must be integral.
    pub fn classify(&self) -> WheelKind {
        if !is_zero(self.delta_x) && !is_zero(self.delta_y) {
            return WheelKind::Touchpad;
        }
        let coarse = self.raw_delta.map(|raw| raw.abs() > COARSE_RAW_DELTA);
        let mouse = match self.delta_mode {
            DeltaMode::Line | DeltaMode::Page => coarse != Some(false),
            DeltaMode::Pixel => match self.raw_delta {
                Some(raw) => {
                    let on_notch_grid = is_zero(raw % RAW_DELTA_NOTCH);
                    let fractional_clock = !is_zero(self.time_stamp.fract());
                    coarse == Some(true) && on_notch_grid && (!fractional_clock || self.is_integral())
                }
                None => self.is_integral(),
            },
        };
        if mouse {
            WheelKind::Mouse
        } else {
            WheelKind::Touchpad
        }
    }

    /// Deltas converted to canvas pixels.
    pub fn pixel_delta(&self, line_height: f64, page_height: f64, dpi_scale: f64) -> Point {
        let unit = match self.delta_mode {
            DeltaMode::Pixel => dpi_scale,
            DeltaMode::Line => line_height * dpi_scale,
            DeltaMode::Page => page_height,
        };
        Point::new(self.delta_x * unit, self.delta_y * unit)
    }

    fn is_integral(&self) -> bool {
        let larger = self.delta_x.abs().max(self.delta_y.abs());
        is_zero(larger.fract())
    }
}

/// Input fed to a [`ViewportSession`](super::ViewportSession).
///
/// Positions are canvas pixels; `now` is the event time in ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    MouseDown { x: f64, y: f64, now: f64 },
    /// `drag` is the distance from the pointer-down position while a
    /// button is held.
    MouseMove {
        x: f64,
        y: f64,
        #[serde(default)]
        drag: Option<Point>,
        now: f64,
    },
    MouseUp { x: f64, y: f64, now: f64 },
    MouseLeave { now: f64 },
    Click { x: f64, y: f64, now: f64 },
    Wheel {
        x: f64,
        y: f64,
        #[serde(flatten)]
        input: WheelInput,
        now: f64,
    },
    ScrollTo { x: f64, y: f64, now: f64 },
    ScrollBy { x: f64, y: f64, now: f64 },
    ScrollVelocity { vx: f64, vy: f64, now: f64 },
    Timers { now: f64 },
    Frame { now: f64 },
}

impl InputEvent {
    pub fn now(&self) -> f64 {
        match self {
            Self::MouseDown { now, .. }
            | Self::MouseMove { now, .. }
            | Self::MouseUp { now, .. }
            | Self::MouseLeave { now }
            | Self::Click { now, .. }
            | Self::Wheel { now, .. }
            | Self::ScrollTo { now, .. }
            | Self::ScrollBy { now, .. }
            | Self::ScrollVelocity { now, .. }
            | Self::Timers { now }
            | Self::Frame { now } => *now,
        }
    }
}
