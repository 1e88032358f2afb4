//! Canvas 2D backend.
//!
//! Draws through the HTML Canvas 2D API via web-sys. Tiles are kept as
//! offscreen `HtmlCanvasElement`s and blitted with `drawImage`.

mod web_canvas;

pub use web_canvas::{context_2d, new_tile_canvas, WebCanvas};
