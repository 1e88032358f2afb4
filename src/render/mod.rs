//! Tile painting with pluggable canvas backends.
//!
//! This module provides:
//! - The `Canvas` drawing trait and the `TileStore` lookup trait
//! - Canvas 2D backend (browser) and a recording backend (tests, replay)
//! - The tile painter: pane compositing, page backgrounds, zoom frames
//! - The debug overlay

pub mod backend;
pub mod cache;
pub mod canvas;
pub mod colors;
mod debug_overlay;
mod pages;
mod painter;
pub mod recording;
mod zoom_frame;

// Re-export commonly used types
pub use backend::Canvas;
pub use cache::{MemoryTileStore, TileStore};
pub use canvas::WebCanvas;
pub use colors::{palette, CssColor};
pub use painter::{
    FrameOutcome, FrameReport, FrameStatus, PainterOptions, PaintScope, TilePainter, ZoomEdge,
};
pub use recording::{DrawOp, RecordingCanvas};
pub use zoom_frame::ZoomDocPos;
