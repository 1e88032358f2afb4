//! Viewport interaction: scroll engine, animation and timers, and the
//! browser-facing `TileView`.
//!
//! Everything except `TileView` is platform independent and is driven
//! through the [`Container`] trait, so the CLI and the tests can replay
//! input against a recording canvas.

mod animation;
mod container;
mod events;
mod scroll;
mod session;
mod timer;
#[cfg(target_arch = "wasm32")]
mod tile_view;

pub use animation::{AnimationClock, FRAME_MS};
pub use container::{AnchorSection, AnimationOptions, Container, Cursor, FrameTiming};
pub use events::{DeltaMode, InputEvent, Propagation, WheelInput, WheelKind, COARSE_RAW_DELTA, RAW_DELTA_NOTCH};
pub use scroll::{
    Axis, BarState, ScrollEngine, ScrollGeometry, ScrollOptions, ScrollScope, ScrollState, WheelMode,
};
pub use session::ViewportSession;
pub use timer::{next_due, TimerTask};
#[cfg(target_arch = "wasm32")]
pub use tile_view::TileView;
